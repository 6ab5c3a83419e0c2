use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kernel::formula::Formula;
use crate::kernel::node::Node;
use crate::kernel::placeholder::Placeholder;
use crate::kernel::substitution::Substitution;
use crate::kernel::term::Term;

// Bindings maintain a mapping from placeholders to the nodes they matched, so that a rule
// pattern can be turned into a concrete formula by substitution.
// Entries are kept in the order they were bound, which is the order diagnostics print them in.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bindings {
    entries: Vec<(Placeholder, Node)>,
}

impl Bindings {
    pub fn new() -> Bindings {
        Bindings { entries: vec![] }
    }

    pub fn get(&self, placeholder: &Placeholder) -> Option<&Node> {
        self.entries
            .iter()
            .find(|(p, _)| p == placeholder)
            .map(|(_, node)| node)
    }

    pub fn get_term(&self, placeholder: &Placeholder) -> Option<&Term> {
        self.get(placeholder).and_then(|node| node.as_term())
    }

    pub fn get_formula(&self, placeholder: &Placeholder) -> Option<&Formula> {
        self.get(placeholder).and_then(|node| node.as_formula())
    }

    pub fn contains(&self, placeholder: &Placeholder) -> bool {
        self.get(placeholder).is_some()
    }

    /// Binds the placeholder if it is unbound.
    /// Returns whether the placeholder now maps to this node.
    /// An existing binding is never changed.
    pub fn bind(&mut self, placeholder: &Placeholder, node: &Node) -> bool {
        match self.get(placeholder) {
            None => {
                self.entries.push((placeholder.clone(), node.clone()));
                true
            }
            Some(existing) => existing == node,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Placeholder, &Node)> {
        self.entries.iter().map(|(p, node)| (p, node))
    }

    /// The substitution that replaces each bound placeholder by its node.
    pub fn to_substitution(&self) -> Substitution {
        self.entries
            .iter()
            .map(|(p, node)| (p.to_node(), node.clone()))
            .collect()
    }
}

impl fmt::Display for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (p, node)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}:{}", p, node)?;
        }
        write!(f, "}}")
    }
}
