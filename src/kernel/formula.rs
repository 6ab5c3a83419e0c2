use serde::{Deserialize, Serialize};

use crate::error::ConstructError;
use crate::kernel::node::Node;
use crate::kernel::placeholder::{Placeholder, PlaceholderKind, SubstTemplate};
use crate::kernel::substitution::Substitution;
use crate::kernel::term::{Term, Variable};

pub const NOT: &str = "~";
pub const AND: &str = "&";
pub const OR: &str = "|";
pub const IMPLIES: &str = "->";
pub const IFF: &str = "<->";
pub const EQUAL: &str = "=";

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum QuantifierKind {
    All,
    Exists,
}

/// A Formula is a boolean-valued expression.
/// The top-level expression of every proof step is a Formula.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Formula {
    // A propositional letter. Not the same thing as a relation with no arguments.
    Letter(String),

    Relation(String, Vec<Term>),

    // A unary connective, like negation.
    Prefix(String, Box<Formula>),

    // A binary connective, like conjunction or implication.
    Infix(String, Box<Formula>, Box<Formula>),

    // A binary relation between terms, like equality.
    InfixRelation(String, Term, Term),

    // The bound term is always variable-like.
    Quantifier(QuantifierKind, Term, Box<Formula>),

    // "Let x be arbitrary". Introduces a new free variable, to prepare for universal introduction.
    New(Term),

    // "Let x satisfy P". Assumes P with a new free variable x, to prepare for existential
    // elimination. x is not bound by this: it stays free in P.
    Let(Term, Box<Formula>),

    // A command to generate a conclusion by applying a rule. Never proved itself.
    Apply(String, Vec<Node>),

    // Only appears in rule patterns. Always a Formula placeholder.
    Placeholder(Placeholder),

    // Only appears in rule patterns.
    Subst(SubstTemplate),
}

impl From<SubstTemplate> for Formula {
    fn from(template: SubstTemplate) -> Formula {
        Formula::Subst(template)
    }
}

fn require_binder(context: &'static str, term: &Term) -> Result<(), ConstructError> {
    if term.is_variable_like() {
        Ok(())
    } else {
        Err(ConstructError::NotAVariable {
            context,
            found: term.to_string(),
        })
    }
}

impl Formula {
    pub fn letter(name: &str) -> Formula {
        Formula::Letter(name.to_string())
    }

    pub fn relation(name: &str, args: Vec<Term>) -> Formula {
        Formula::Relation(name.to_string(), args)
    }

    pub fn prefix(symbol: &str, arg: Formula) -> Formula {
        Formula::Prefix(symbol.to_string(), Box::new(arg))
    }

    pub fn infix(symbol: &str, left: Formula, right: Formula) -> Formula {
        Formula::Infix(symbol.to_string(), Box::new(left), Box::new(right))
    }

    pub fn infix_relation(symbol: &str, left: Term, right: Term) -> Formula {
        Formula::InfixRelation(symbol.to_string(), left, right)
    }

    pub fn not(arg: Formula) -> Formula {
        Formula::prefix(NOT, arg)
    }

    pub fn and(left: Formula, right: Formula) -> Formula {
        Formula::infix(AND, left, right)
    }

    pub fn or(left: Formula, right: Formula) -> Formula {
        Formula::infix(OR, left, right)
    }

    pub fn implies(left: Formula, right: Formula) -> Formula {
        Formula::infix(IMPLIES, left, right)
    }

    pub fn iff(left: Formula, right: Formula) -> Formula {
        Formula::infix(IFF, left, right)
    }

    pub fn equal(left: Term, right: Term) -> Formula {
        Formula::infix_relation(EQUAL, left, right)
    }

    pub fn all(bound: Variable, body: Formula) -> Formula {
        Formula::Quantifier(QuantifierKind::All, bound.into(), Box::new(body))
    }

    pub fn exists(bound: Variable, body: Formula) -> Formula {
        Formula::Quantifier(QuantifierKind::Exists, bound.into(), Box::new(body))
    }

    /// A quantifier whose binder may be a variable placeholder.
    pub fn quantifier(
        kind: QuantifierKind,
        bound: Term,
        body: Formula,
    ) -> Result<Formula, ConstructError> {
        require_binder("quantifier", &bound)?;
        Ok(Formula::Quantifier(kind, bound, Box::new(body)))
    }

    pub fn new_var(var: Variable) -> Formula {
        Formula::New(var.into())
    }

    pub fn try_new_var(var: Term) -> Result<Formula, ConstructError> {
        require_binder("New", &var)?;
        Ok(Formula::New(var))
    }

    pub fn let_in(var: Variable, body: Formula) -> Formula {
        Formula::Let(var.into(), Box::new(body))
    }

    pub fn try_let_in(var: Term, body: Formula) -> Result<Formula, ConstructError> {
        require_binder("Let", &var)?;
        Ok(Formula::Let(var, Box::new(body)))
    }

    pub fn apply(rule: &str, args: Vec<Node>) -> Formula {
        Formula::Apply(rule.to_string(), args)
    }

    pub fn placeholder(name: &str) -> Formula {
        Formula::Placeholder(Placeholder::formula(name))
    }

    pub fn as_placeholder(&self) -> Option<&Placeholder> {
        match self {
            Formula::Placeholder(p) => Some(p),
            _ => None,
        }
    }

    /// The variable introduced by a New or Let meta-formula.
    pub fn introduced_variable(&self) -> Option<&Term> {
        match self {
            Formula::New(v) | Formula::Let(v, _) => Some(v),
            _ => None,
        }
    }

    pub fn is_let(&self) -> bool {
        matches!(self, Formula::Let(..))
    }

    pub fn is_infix(&self) -> bool {
        matches!(self, Formula::Infix(..) | Formula::InfixRelation(..))
    }

    /// Compound formulas have children and are matched child by child.
    pub fn is_compound(&self) -> bool {
        !matches!(
            self,
            Formula::Letter(_) | Formula::Placeholder(_) | Formula::Subst(_)
        )
    }

    pub fn push_free(&self, output: &mut Vec<Variable>) {
        match self {
            Formula::Letter(_) | Formula::Placeholder(_) | Formula::Subst(_) => {}
            Formula::Relation(_, args) => {
                for arg in args {
                    arg.push_free(output);
                }
            }
            Formula::Prefix(_, arg) => arg.push_free(output),
            Formula::Infix(_, left, right) => {
                left.push_free(output);
                right.push_free(output);
            }
            Formula::InfixRelation(_, left, right) => {
                left.push_free(output);
                right.push_free(output);
            }
            Formula::Quantifier(_, bound, body) => {
                for v in body.free() {
                    if bound.as_variable() != Some(&v) && !output.contains(&v) {
                        output.push(v);
                    }
                }
            }
            Formula::New(var) => var.push_free(output),
            Formula::Let(_, body) => body.push_free(output),
            Formula::Apply(_, args) => {
                for arg in args {
                    arg.push_free(output);
                }
            }
        }
    }

    /// The free variables, in order of first occurrence.
    pub fn free(&self) -> Vec<Variable> {
        let mut output = vec![];
        self.push_free(&mut output);
        output
    }

    pub fn has_free(&self, var: &Variable) -> bool {
        self.free().contains(var)
    }

    /// Simultaneous substitution.
    /// A formula equal to a key is replaced wholesale. Otherwise every child is substituted
    /// independently, so no replacement is ever substituted into again.
    pub fn subst(&self, substitution: &Substitution) -> Formula {
        if let Some(replacement) = substitution.get_formula(self) {
            return replacement.clone();
        }
        match self {
            Formula::Letter(_) | Formula::Placeholder(_) | Formula::Subst(_) => self.clone(),
            Formula::Relation(name, args) => Formula::Relation(
                name.clone(),
                args.iter().map(|arg| arg.subst(substitution)).collect(),
            ),
            Formula::Prefix(symbol, arg) => {
                Formula::Prefix(symbol.clone(), Box::new(arg.subst(substitution)))
            }
            Formula::Infix(symbol, left, right) => Formula::Infix(
                symbol.clone(),
                Box::new(left.subst(substitution)),
                Box::new(right.subst(substitution)),
            ),
            Formula::InfixRelation(symbol, left, right) => Formula::InfixRelation(
                symbol.clone(),
                left.subst(substitution),
                right.subst(substitution),
            ),
            Formula::Quantifier(kind, bound, body) => Formula::Quantifier(
                *kind,
                bound.subst_binder(substitution),
                Box::new(body.subst(substitution)),
            ),
            Formula::New(var) => Formula::New(var.subst_binder(substitution)),
            Formula::Let(var, body) => Formula::Let(
                var.subst_binder(substitution),
                Box::new(body.subst(substitution)),
            ),
            Formula::Apply(rule, args) => Formula::Apply(
                rule.clone(),
                args.iter().map(|arg| arg.subst(substitution)).collect(),
            ),
        }
    }

    /// Checks the constraints the typed constructors enforce.
    /// Needed for trees that were deserialized rather than constructed.
    pub fn validate(&self) -> Result<(), ConstructError> {
        match self {
            Formula::Letter(_) => Ok(()),
            Formula::Relation(_, args) => args.iter().try_for_each(validate_term),
            Formula::Prefix(_, arg) => arg.validate(),
            Formula::Infix(_, left, right) => {
                left.validate()?;
                right.validate()
            }
            Formula::InfixRelation(_, left, right) => {
                validate_term(left)?;
                validate_term(right)
            }
            Formula::Quantifier(_, bound, body) => {
                require_binder("quantifier", bound)?;
                body.validate()
            }
            Formula::New(var) => require_binder("New", var),
            Formula::Let(var, body) => {
                require_binder("Let", var)?;
                body.validate()
            }
            Formula::Apply(_, args) => args.iter().try_for_each(|arg| match arg {
                Node::Term(t) => validate_term(t),
                Node::Formula(f) => f.validate(),
            }),
            Formula::Placeholder(p) => {
                if p.kind == PlaceholderKind::Formula {
                    Ok(())
                } else {
                    Err(ConstructError::WrongPlaceholderKind {
                        placeholder: p.clone(),
                        expected: PlaceholderKind::Formula,
                    })
                }
            }
            Formula::Subst(template) => template.validate(),
        }
    }
}

fn validate_term(term: &Term) -> Result<(), ConstructError> {
    match term {
        Term::Variable(_) => Ok(()),
        Term::Function(_, args) => args.iter().try_for_each(validate_term),
        Term::Placeholder(p) => {
            if p.kind == PlaceholderKind::Formula {
                Err(ConstructError::WrongPlaceholderKind {
                    placeholder: p.clone(),
                    expected: PlaceholderKind::Term,
                })
            } else {
                Ok(())
            }
        }
    }
}
