use serde::{Deserialize, Serialize};

use crate::kernel::placeholder::{Placeholder, PlaceholderKind};
use crate::kernel::substitution::Substitution;

/// A first-order variable.
/// Two variables are the same variable exactly when their names are equal.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
}

impl Variable {
    pub fn new(name: &str) -> Variable {
        Variable {
            name: name.to_string(),
        }
    }
}

/// A Term is a non-boolean expression.
/// Function applications with no arguments are constants.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Term {
    Variable(Variable),

    Function(String, Vec<Term>),

    // Only appears in rule patterns. Always a Term or Variable placeholder.
    Placeholder(Placeholder),
}

impl From<Variable> for Term {
    fn from(v: Variable) -> Term {
        Term::Variable(v)
    }
}

impl Term {
    pub fn variable(name: &str) -> Term {
        Term::Variable(Variable::new(name))
    }

    pub fn constant(name: &str) -> Term {
        Term::Function(name.to_string(), vec![])
    }

    pub fn function(name: &str, args: Vec<Term>) -> Term {
        Term::Function(name.to_string(), args)
    }

    /// A placeholder that matches any term.
    pub fn placeholder(name: &str) -> Term {
        Term::Placeholder(Placeholder::term(name))
    }

    /// A placeholder that matches only a variable.
    pub fn variable_placeholder(name: &str) -> Term {
        Term::Placeholder(Placeholder::variable(name))
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Term::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_placeholder(&self) -> Option<&Placeholder> {
        match self {
            Term::Placeholder(p) => Some(p),
            _ => None,
        }
    }

    /// Whether this term can sit in a binder position.
    /// That is a variable, or a placeholder standing for one.
    pub fn is_variable_like(&self) -> bool {
        match self {
            Term::Variable(_) => true,
            Term::Placeholder(p) => p.kind == PlaceholderKind::Variable,
            Term::Function(..) => false,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Term::Placeholder(_))
    }

    /// Appends the free variables of this term to `output`, skipping any already there.
    pub fn push_free(&self, output: &mut Vec<Variable>) {
        match self {
            Term::Variable(v) => {
                if !output.contains(v) {
                    output.push(v.clone());
                }
            }
            Term::Function(_, args) => {
                for arg in args {
                    arg.push_free(output);
                }
            }
            Term::Placeholder(_) => {}
        }
    }

    /// The free variables, in order of first occurrence.
    pub fn free(&self) -> Vec<Variable> {
        let mut output = vec![];
        self.push_free(&mut output);
        output
    }

    pub fn has_free(&self, var: &Variable) -> bool {
        match self {
            Term::Variable(v) => v == var,
            Term::Function(_, args) => args.iter().any(|arg| arg.has_free(var)),
            Term::Placeholder(_) => false,
        }
    }

    /// Simultaneous substitution.
    /// A term equal to a key is replaced wholesale, and its replacement is not visited again.
    pub fn subst(&self, substitution: &Substitution) -> Term {
        if let Some(replacement) = substitution.get_term(self) {
            return replacement.clone();
        }
        match self {
            Term::Function(name, args) => Term::Function(
                name.clone(),
                args.iter().map(|arg| arg.subst(substitution)).collect(),
            ),
            _ => self.clone(),
        }
    }

    /// Substitution into a binder slot.
    /// The binder only changes when the replacement can itself be a binder.
    pub fn subst_binder(&self, substitution: &Substitution) -> Term {
        match substitution.get_term(self) {
            Some(replacement) if replacement.is_variable_like() => replacement.clone(),
            _ => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Term {
        Term::variable("x")
    }

    fn y() -> Term {
        Term::variable("y")
    }

    #[test]
    fn test_term_equality() {
        let t = Term::function("f", vec![x(), Term::constant("c")]);
        assert_eq!(t, t.clone());
        assert_ne!(t, Term::function("g", vec![x(), Term::constant("c")]));
        assert_ne!(t, Term::function("f", vec![y(), Term::constant("c")]));
        assert_ne!(t, Term::function("f", vec![x()]));
        assert_ne!(Term::constant("x"), x());
    }

    #[test]
    fn test_term_free_is_ordered_and_deduplicated() {
        let t = Term::function("f", vec![y(), x(), Term::function("g", vec![y()])]);
        assert_eq!(t.free(), vec![Variable::new("y"), Variable::new("x")]);
        assert!(Term::constant("c").free().is_empty());
        assert!(Term::placeholder("t1").free().is_empty());
    }

    #[test]
    fn test_variable_like() {
        assert!(x().is_variable_like());
        assert!(Term::variable_placeholder("v1").is_variable_like());
        assert!(!Term::placeholder("t1").is_variable_like());
        assert!(!Term::constant("c").is_variable_like());
    }

    #[test]
    fn test_term_subst_is_simultaneous() {
        let mut s = Substitution::new();
        s.insert(x().into(), y().into());
        s.insert(y().into(), x().into());
        let t = Term::function("f", vec![x(), y()]);
        assert_eq!(t.subst(&s), Term::function("f", vec![y(), x()]));
    }

    #[test]
    fn test_subst_binder_keeps_non_variables_out() {
        let mut s = Substitution::new();
        s.insert(x().into(), Term::constant("c").into());
        assert_eq!(x().subst_binder(&s), x());
        let mut s = Substitution::new();
        s.insert(x().into(), y().into());
        assert_eq!(x().subst_binder(&s), y());
    }
}
