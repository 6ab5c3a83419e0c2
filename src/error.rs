use std::fmt;

use crate::kernel::display::{display_list, display_pairs};
use crate::kernel::node::Node;
use crate::kernel::placeholder::{Placeholder, PlaceholderKind};
use crate::kernel::term::{Term, Variable};

pub type Result<T> = std::result::Result<T, Error>;

/// Which side of a substitution a term came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Source,
    Replacement,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Source => write!(f, "source"),
            Side::Replacement => write!(f, "replacement"),
        }
    }
}

/// A side condition that failed while matching or generating.
/// These are more severe than a structural mismatch. The proof step fails, and the message is
/// shown to the author as the reason.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    // An assumed variable is already free somewhere in the proof.
    NotFresh { variable: Term, free: Vec<Variable> },

    // A substituted term would have a free variable captured by a quantifier.
    Capture {
        side: Side,
        node: Node,
        bound: Vec<Term>,
    },

    // A variable that must not be free in a formula is free in it.
    FreeIn {
        variable: Variable,
        free: Vec<Variable>,
    },

    // Some occurrences were substituted, but not all of them the same way.
    Incomplete { pairs: Vec<(Node, Node)> },

    // The rule needs data that was not supplied with the apply command.
    MissingWitness(&'static str),

    // The rule refers to a placeholder that nothing has bound yet.
    Unbound(Placeholder),

    // A placeholder is bound to the wrong kind of node for where it is used.
    KindMismatch { placeholder: Placeholder, found: Node },
}

impl Error {
    pub fn error_type(&self) -> &'static str {
        match self {
            Error::NotFresh { .. } => "NotFresh",
            Error::Capture { .. } => "Capture",
            Error::FreeIn { .. } => "FreeIn",
            Error::Incomplete { .. } => "Incomplete",
            Error::MissingWitness(_) => "MissingWitness",
            Error::Unbound(_) => "Unbound",
            Error::KindMismatch { .. } => "KindMismatch",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotFresh { variable, free } => write!(
                f,
                "variable {} already appears free in the proof among {}",
                variable,
                display_list(free)
            ),
            Error::Capture { side, node, bound } => write!(
                f,
                "{} term {} includes a bound variable in {}",
                side,
                node,
                display_list(bound)
            ),
            Error::FreeIn { variable, free } => write!(
                f,
                "variable {} appears free in the formula among {}",
                variable,
                display_list(free)
            ),
            Error::Incomplete { pairs } => write!(
                f,
                "not all occurrences were substituted the same way: {}",
                display_pairs(pairs)
            ),
            Error::MissingWitness(expected) => {
                write!(f, "the apply command requires an argument: {}", expected)
            }
            Error::Unbound(p) => write!(f, "placeholder {} is not bound", p),
            Error::KindMismatch { placeholder, found } => {
                write!(f, "placeholder {} is bound to {}", placeholder, found)
            }
        }
    }
}

impl std::error::Error for Error {}

/// Ill-formed syntax, found when a node is constructed or a rule table is loaded.
/// These are mistakes in the rule table or the driver, not in a proof.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConstructError {
    // Something other than a variable sits where a variable is required.
    NotAVariable { context: &'static str, found: String },

    // A placeholder of one kind sits where another kind is required.
    WrongPlaceholderKind {
        placeholder: Placeholder,
        expected: PlaceholderKind,
    },

    MalformedSubstitution(String),

    // Two rules in one table share a name.
    DuplicateRule(String),

    // The rule table could not be read at all.
    Json(String),
}

impl fmt::Display for ConstructError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConstructError::NotAVariable { context, found } => {
                write!(f, "{} requires a variable, found {}", context, found)
            }
            ConstructError::WrongPlaceholderKind {
                placeholder,
                expected,
            } => write!(
                f,
                "placeholder {} is a {:?} placeholder, expected {:?}",
                placeholder, placeholder.kind, expected
            ),
            ConstructError::MalformedSubstitution(s) => {
                write!(f, "malformed substitution: {}", s)
            }
            ConstructError::DuplicateRule(name) => write!(f, "duplicate rule {}", name),
            ConstructError::Json(s) => write!(f, "could not read rule table: {}", s),
        }
    }
}

impl std::error::Error for ConstructError {}

impl From<serde_json::Error> for ConstructError {
    fn from(err: serde_json::Error) -> Self {
        ConstructError::Json(err.to_string())
    }
}
