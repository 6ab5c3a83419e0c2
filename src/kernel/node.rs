use serde::{Deserialize, Serialize};

use crate::kernel::formula::Formula;
use crate::kernel::substitution::Substitution;
use crate::kernel::term::{Term, Variable};

/// Either kind of syntax node.
/// Used where terms and formulas can both appear: bindings, substitutions, rule arguments,
/// and the positions reported by a diff.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Term(Term),
    Formula(Formula),
}

impl From<Term> for Node {
    fn from(t: Term) -> Node {
        Node::Term(t)
    }
}

impl From<Variable> for Node {
    fn from(v: Variable) -> Node {
        Node::Term(Term::Variable(v))
    }
}

impl From<Formula> for Node {
    fn from(f: Formula) -> Node {
        Node::Formula(f)
    }
}

impl Node {
    pub fn as_term(&self) -> Option<&Term> {
        match self {
            Node::Term(t) => Some(t),
            Node::Formula(_) => None,
        }
    }

    pub fn as_formula(&self) -> Option<&Formula> {
        match self {
            Node::Formula(f) => Some(f),
            Node::Term(_) => None,
        }
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        self.as_term().and_then(|t| t.as_variable())
    }

    pub fn push_free(&self, output: &mut Vec<Variable>) {
        match self {
            Node::Term(t) => t.push_free(output),
            Node::Formula(f) => f.push_free(output),
        }
    }

    pub fn free(&self) -> Vec<Variable> {
        let mut output = vec![];
        self.push_free(&mut output);
        output
    }

    pub fn subst(&self, substitution: &Substitution) -> Node {
        match self {
            Node::Term(t) => Node::Term(t.subst(substitution)),
            Node::Formula(f) => Node::Formula(f.subst(substitution)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_never_equal_formulas() {
        let t: Node = Term::constant("p").into();
        let f: Node = Formula::letter("p").into();
        assert_ne!(t, f);
    }

    #[test]
    fn test_node_free() {
        let n: Node = Formula::relation("P", vec![Term::variable("x")]).into();
        assert_eq!(n.free(), vec![Variable::new("x")]);
        assert_eq!(n.as_variable(), None);
        let v: Node = Variable::new("x").into();
        assert_eq!(v.as_variable(), Some(&Variable::new("x")));
    }
}
