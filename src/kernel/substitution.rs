use std::fmt;

use crate::kernel::formula::Formula;
use crate::kernel::node::Node;
use crate::kernel::term::Term;

/// A Substitution maps nodes to replacement nodes.
/// Keys are compared structurally. The pairs are kept in insertion order, and inserting a key
/// that is already present replaces its value.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Substitution {
    pairs: Vec<(Node, Node)>,
}

impl Substitution {
    pub fn new() -> Substitution {
        Substitution { pairs: vec![] }
    }

    pub fn insert(&mut self, key: Node, value: Node) {
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn get(&self, key: &Node) -> Option<&Node> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// The replacement for a term, if it has a term replacement.
    pub fn get_term(&self, term: &Term) -> Option<&Term> {
        self.pairs.iter().find_map(|(k, v)| match (k, v) {
            (Node::Term(k), Node::Term(v)) if k == term => Some(v),
            _ => None,
        })
    }

    /// The replacement for a formula, if it has a formula replacement.
    pub fn get_formula(&self, formula: &Formula) -> Option<&Formula> {
        self.pairs.iter().find_map(|(k, v)| match (k, v) {
            (Node::Formula(k), Node::Formula(v)) if k == formula => Some(v),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Node, &Node)> {
        self.pairs.iter().map(|(k, v)| (k, v))
    }
}

impl FromIterator<(Node, Node)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (Node, Node)>>(iter: I) -> Substitution {
        let mut substitution = Substitution::new();
        for (key, value) in iter {
            substitution.insert(key, value);
        }
        substitution
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}:{}", key, value)?;
        }
        write!(f, "}}")
    }
}
