use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConstructError, Error};
use crate::generator::{generate, Witness};
use crate::kernel::bindings::Bindings;
use crate::kernel::display::display_list;
use crate::kernel::formula::Formula;
use crate::kernel::term::Variable;
use crate::matcher::{Matcher, Mismatch, RuleKind};

/// An inference rule, written with placeholders.
/// A subproof premise contributes two consecutive premises: its assumption and its last line.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,

    #[serde(default)]
    pub kind: RuleKind,

    pub premises: Vec<Formula>,
    pub conclusion: Formula,
}

/// Why a rule could not be used for a proof step.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StepFailure {
    WrongPremiseCount { expected: usize, found: usize },

    // The premise at this index doesn't have the shape the rule requires.
    DoesNotApply {
        premise: usize,
        mismatches: Vec<Mismatch>,
    },

    ConclusionMismatch { mismatches: Vec<Mismatch> },

    // A side condition failed.
    Violation(Error),
}

impl From<Error> for StepFailure {
    fn from(error: Error) -> Self {
        StepFailure::Violation(error)
    }
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StepFailure::WrongPremiseCount { expected, found } => {
                write!(f, "expected {} premises, found {}", expected, found)
            }
            StepFailure::DoesNotApply {
                premise,
                mismatches,
            } => write!(
                f,
                "premise {} does not match: {}",
                premise + 1,
                display_list(mismatches)
            ),
            StepFailure::ConclusionMismatch { mismatches } => {
                write!(f, "conclusion does not match: {}", display_list(mismatches))
            }
            StepFailure::Violation(error) => write!(f, "{}", error),
        }
    }
}

impl std::error::Error for StepFailure {}

impl Rule {
    pub fn new(name: &str, kind: RuleKind, premises: Vec<Formula>, conclusion: Formula) -> Rule {
        Rule {
            name: name.to_string(),
            kind,
            premises,
            conclusion,
        }
    }

    pub fn validate(&self) -> Result<(), ConstructError> {
        for premise in &self.premises {
            premise.validate()?;
        }
        self.conclusion.validate()
    }

    /// Matches the premise patterns against the cited lines, in order.
    /// The bindings from earlier premises constrain later ones.
    pub fn check(&self, lines: &[Formula], free: &[Variable]) -> Result<Bindings, StepFailure> {
        if lines.len() != self.premises.len() {
            return Err(StepFailure::WrongPremiseCount {
                expected: self.premises.len(),
                found: lines.len(),
            });
        }
        let mut bindings = Bindings::new();
        for (i, (pattern, line)) in self.premises.iter().zip(lines).enumerate() {
            let mismatches = Matcher::new(&mut bindings, free, self.kind).mismatch(pattern, line)?;
            if !mismatches.is_empty() {
                debug!(rule = %self.name, premise = i, line = %line, "premise does not match");
                return Err(StepFailure::DoesNotApply {
                    premise: i,
                    mismatches,
                });
            }
        }
        Ok(bindings)
    }

    /// Builds the conclusion of the rule for these lines.
    /// The generated conclusion is matched against the rule again, so a witness that violates a
    /// side condition is caught here.
    pub fn apply(
        &self,
        lines: &[Formula],
        free: &[Variable],
        witness: Option<&Witness>,
    ) -> Result<Formula, StepFailure> {
        let mut bindings = self.check(lines, free)?;
        let conclusion = generate(&self.conclusion, &bindings, witness)?;
        self.match_conclusion(&mut bindings, &conclusion, free)?;
        Ok(conclusion)
    }

    /// Checks that a conclusion the author wrote follows from the lines by this rule.
    pub fn verify(
        &self,
        lines: &[Formula],
        conclusion: &Formula,
        free: &[Variable],
    ) -> Result<Bindings, StepFailure> {
        let mut bindings = self.check(lines, free)?;
        self.match_conclusion(&mut bindings, conclusion, free)?;
        Ok(bindings)
    }

    fn match_conclusion(
        &self,
        bindings: &mut Bindings,
        conclusion: &Formula,
        free: &[Variable],
    ) -> Result<(), StepFailure> {
        let mismatches =
            Matcher::new(bindings, free, self.kind).mismatch(&self.conclusion, conclusion)?;
        if !mismatches.is_empty() {
            debug!(rule = %self.name, conclusion = %conclusion, "conclusion does not match");
            return Err(StepFailure::ConclusionMismatch { mismatches });
        }
        Ok(())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: ", self.name)?;
        for (i, premise) in self.premises.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", premise)?;
        }
        write!(f, " |- {}", self.conclusion)
    }
}

/// The rules available to a proof, by name.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RuleTable {
    rules: BTreeMap<String, Rule>,
}

impl RuleTable {
    pub fn new() -> RuleTable {
        RuleTable {
            rules: BTreeMap::new(),
        }
    }

    /// Adds a rule after validating it.
    pub fn insert(&mut self, rule: Rule) -> Result<(), ConstructError> {
        rule.validate()?;
        if self.rules.contains_key(&rule.name) {
            return Err(ConstructError::DuplicateRule(rule.name));
        }
        self.rules.insert(rule.name.clone(), rule);
        Ok(())
    }

    pub fn from_rules(rules: Vec<Rule>) -> Result<RuleTable, ConstructError> {
        let mut table = RuleTable::new();
        for rule in rules {
            table.insert(rule)?;
        }
        Ok(table)
    }

    /// Loads a table from a JSON array of rules.
    pub fn from_json(text: &str) -> Result<RuleTable, ConstructError> {
        let rules: Vec<Rule> = serde_json::from_str(text)?;
        RuleTable::from_rules(rules)
    }

    pub fn to_json(&self) -> Result<String, ConstructError> {
        let rules: Vec<&Rule> = self.rules.values().collect();
        Ok(serde_json::to_string_pretty(&rules)?)
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(|name| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
