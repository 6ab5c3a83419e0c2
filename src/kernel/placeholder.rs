use serde::{Deserialize, Serialize};

use crate::error::ConstructError;
use crate::kernel::formula::Formula;
use crate::kernel::node::Node;
use crate::kernel::term::Term;

/// Which kind of node a placeholder stands for.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum PlaceholderKind {
    Formula,
    Term,

    // Matches only variables. Used in binder positions.
    Variable,
}

/// A placeholder appears only in rule patterns, never in proofs.
/// The first time a placeholder is matched it is bound to the candidate node.
/// Later occurrences must match the bound node.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub name: String,
}

impl Placeholder {
    pub fn new(kind: PlaceholderKind, name: &str) -> Placeholder {
        Placeholder {
            kind,
            name: name.to_string(),
        }
    }

    pub fn formula(name: &str) -> Placeholder {
        Placeholder::new(PlaceholderKind::Formula, name)
    }

    pub fn term(name: &str) -> Placeholder {
        Placeholder::new(PlaceholderKind::Term, name)
    }

    pub fn variable(name: &str) -> Placeholder {
        Placeholder::new(PlaceholderKind::Variable, name)
    }

    /// The pattern node for this placeholder, in the position its kind requires.
    pub fn to_node(&self) -> Node {
        match self.kind {
            PlaceholderKind::Formula => Node::Formula(Formula::Placeholder(self.clone())),
            PlaceholderKind::Term | PlaceholderKind::Variable => {
                Node::Term(Term::Placeholder(self.clone()))
            }
        }
    }
}

/// The flavor of a substitution template.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum SubstKind {
    /// Every observed difference must be one of the declared replacements.
    /// Not every occurrence has to be replaced.
    Some,

    /// Like Some, but every occurrence must be replaced the same way.
    All,

    /// The declared variables must not occur free in the bound formula.
    NotIn,
}

/// One declared replacement in a substitution template, like {t1:s1}.
/// A missing replacement is written {v2:None} in rule tables.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct SubstPair {
    pub source: Placeholder,
    pub replacement: Option<Placeholder>,
}

impl SubstPair {
    pub fn new(source: Placeholder, replacement: Placeholder) -> SubstPair {
        SubstPair {
            source,
            replacement: Some(replacement),
        }
    }

    pub fn absent(source: Placeholder) -> SubstPair {
        SubstPair {
            source,
            replacement: None,
        }
    }
}

/// A formula placeholder that also records substitutions.
/// For example, in the substitution rule
///   t1 = s1, S1, S1{t1:s1}
/// the last pattern matches S1 with some occurrences of t1 replaced by s1.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct SubstTemplate {
    pub kind: SubstKind,

    /// The formula placeholder the substitution applies to.
    pub pattern: Placeholder,

    pub pairs: Vec<SubstPair>,
}

impl SubstTemplate {
    pub fn new(
        kind: SubstKind,
        pattern: Placeholder,
        pairs: Vec<SubstPair>,
    ) -> Result<SubstTemplate, ConstructError> {
        let template = SubstTemplate {
            kind,
            pattern,
            pairs,
        };
        template.validate()?;
        Ok(template)
    }

    /// Builds a template from the single argument written after the pattern name.
    /// The shorthand P1(v1) carries no substitution and reads as the identity pair v1 -> v1.
    pub fn from_argument(
        kind: SubstKind,
        pattern: Placeholder,
        arg: &Node,
    ) -> Result<SubstTemplate, ConstructError> {
        match arg {
            Node::Term(Term::Placeholder(p)) => {
                SubstTemplate::new(kind, pattern, vec![SubstPair::new(p.clone(), p.clone())])
            }
            _ => Err(ConstructError::MalformedSubstitution(format!(
                "{}({}): expected a term or variable placeholder",
                pattern.name, arg
            ))),
        }
    }

    pub fn validate(&self) -> Result<(), ConstructError> {
        if self.pattern.kind != PlaceholderKind::Formula {
            return Err(ConstructError::WrongPlaceholderKind {
                placeholder: self.pattern.clone(),
                expected: PlaceholderKind::Formula,
            });
        }
        if self.pairs.is_empty() {
            return Err(ConstructError::MalformedSubstitution(format!(
                "{} has no substitution pairs",
                self.pattern.name
            )));
        }
        for pair in &self.pairs {
            let keys = std::iter::once(&pair.source).chain(pair.replacement.iter());
            for key in keys {
                if key.kind == PlaceholderKind::Formula {
                    return Err(ConstructError::MalformedSubstitution(format!(
                        "{}: substitution key {} must stand for a term",
                        self.pattern.name, key.name
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_identity_includes_kind() {
        assert_ne!(Placeholder::term("a"), Placeholder::variable("a"));
        assert_eq!(Placeholder::term("a"), Placeholder::term("a"));
    }

    #[test]
    fn test_template_requires_formula_pattern() {
        let result = SubstTemplate::new(
            SubstKind::Some,
            Placeholder::term("t1"),
            vec![SubstPair::new(Placeholder::term("t1"), Placeholder::term("s1"))],
        );
        assert!(matches!(
            result,
            Err(ConstructError::WrongPlaceholderKind { .. })
        ));
    }

    #[test]
    fn test_template_rejects_empty_pairs() {
        let result = SubstTemplate::new(SubstKind::All, Placeholder::formula("P1"), vec![]);
        assert!(matches!(
            result,
            Err(ConstructError::MalformedSubstitution(_))
        ));
    }

    #[test]
    fn test_template_rejects_formula_keys() {
        let result = SubstTemplate::new(
            SubstKind::Some,
            Placeholder::formula("P1"),
            vec![SubstPair::new(
                Placeholder::formula("Q1"),
                Placeholder::term("t1"),
            )],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_shorthand_argument_is_identity_pair() {
        let template = SubstTemplate::from_argument(
            SubstKind::Some,
            Placeholder::formula("P1"),
            &Term::variable_placeholder("v1").into(),
        )
        .unwrap();
        assert_eq!(
            template.pairs,
            vec![SubstPair::new(
                Placeholder::variable("v1"),
                Placeholder::variable("v1")
            )]
        );
    }

    #[test]
    fn test_malformed_argument_is_rejected() {
        // Only a placeholder can name a substitution key.
        let arg: Node = Formula::letter("p").into();
        let result =
            SubstTemplate::from_argument(SubstKind::Some, Placeholder::formula("P1"), &arg);
        assert!(matches!(
            result,
            Err(ConstructError::MalformedSubstitution(_))
        ));
        let arg: Node = Term::variable("x").into();
        assert!(
            SubstTemplate::from_argument(SubstKind::Some, Placeholder::formula("P1"), &arg)
                .is_err()
        );
    }
}
