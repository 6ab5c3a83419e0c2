use std::fmt;

use crate::kernel::formula::{Formula, QuantifierKind};
use crate::kernel::node::Node;
use crate::kernel::placeholder::{Placeholder, SubstTemplate};
use crate::kernel::term::{Term, Variable};

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn write_args<T: fmt::Display>(f: &mut fmt::Formatter, name: &str, args: &[T]) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", arg)?;
    }
    write!(f, ")")
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Term::Variable(v) => write!(f, "{}", v),
            Term::Function(name, args) if args.is_empty() => write!(f, "{}", name),
            Term::Function(name, args) => write_args(f, name, args),
            Term::Placeholder(p) => write!(f, "{}", p),
        }
    }
}

/// Displays a formula, with parentheses if it is an infix operation.
struct Operand<'a>(&'a Formula);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_infix() {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Display for QuantifierKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QuantifierKind::All => write!(f, "A"),
            QuantifierKind::Exists => write!(f, "E"),
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Formula::Letter(name) => write!(f, "{}", name),
            Formula::Relation(name, args) => write_args(f, name, args),
            Formula::Prefix(symbol, arg) => write!(f, "{}{}", symbol, Operand(arg)),
            Formula::Infix(symbol, left, right) => {
                write!(f, "{} {} {}", Operand(left), symbol, Operand(right))
            }
            Formula::InfixRelation(symbol, left, right) => {
                write!(f, "{} {} {}", left, symbol, right)
            }
            Formula::Quantifier(kind, bound, body) => {
                write!(f, "{}{}.{}", kind, bound, Operand(body))
            }
            Formula::New(var) => write!(f, "Let {} be arbitrary", var),
            Formula::Let(var, body) => write!(f, "Let {} satisfy {}", var, body),
            Formula::Apply(rule, args) => {
                write!(f, "Apply({}", rule)?;
                for arg in args {
                    write!(f, ", {}", arg)?;
                }
                write!(f, ")")
            }
            Formula::Placeholder(p) => write!(f, "{}", p),
            Formula::Subst(template) => write!(f, "{}", template),
        }
    }
}

impl fmt::Display for SubstTemplate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{{", self.pattern)?;
        for (i, pair) in self.pairs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match &pair.replacement {
                Some(r) => write!(f, "{}:{}", pair.source, r)?,
                None => write!(f, "{}:None", pair.source)?,
            }
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Term(t) => write!(f, "{}", t),
            Node::Formula(formula) => write!(f, "{}", formula),
        }
    }
}

/// Formats a list like [x, y, z].
pub fn display_list<T: fmt::Display>(items: &[T]) -> String {
    let parts: Vec<String> = items.iter().map(|item| item.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

/// Formats source/replacement pairs like { (x, c), (y, d) }.
pub fn display_pairs<A: fmt::Display, B: fmt::Display>(pairs: &[(A, B)]) -> String {
    let parts: Vec<String> = pairs
        .iter()
        .map(|(a, b)| format!("({}, {})", a, b))
        .collect();
    format!("{{ {} }}", parts.join(", "))
}
