use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Error, Result, Side};
use crate::kernel::bindings::Bindings;
use crate::kernel::display::display_list;
use crate::kernel::formula::Formula;
use crate::kernel::node::Node;
use crate::kernel::placeholder::{Placeholder, PlaceholderKind, SubstKind, SubstTemplate};
use crate::kernel::substitution::Substitution;
use crate::kernel::term::{Term, Variable};

/// How the current step treats the New and Let meta-formulas.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum RuleKind {
    /// Introduces an assumption. The assumed variable must be fresh.
    AssumeStep,

    /// Introduces one case of a case analysis.
    AssumeCase,

    /// Discharges an assumption.
    DischargeStep,

    Other,

    #[default]
    Unknown,
}

impl RuleKind {
    fn checks_freshness(self) -> bool {
        self == RuleKind::AssumeStep
    }

    // Otherwise the Let wrapper is transparent and only its formula is matched.
    fn matches_whole_let(self) -> bool {
        matches!(self, RuleKind::AssumeStep | RuleKind::DischargeStep)
    }
}

/// One position where a pattern and a candidate differ.
/// When the pattern is a formula from a proof, this is one difference found by diffing two
/// formulas, and the pair reads as "source was replaced by replacement".
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Mismatch {
    pub source: Node,
    pub replacement: Node,

    /// The binders on the path to this position, outermost first.
    pub bound: Vec<Term>,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} vs {}", self.source, self.replacement)?;
        if !self.bound.is_empty() {
            write!(f, " under {}", display_list(&self.bound))?;
        }
        Ok(())
    }
}

fn check_capture(side: Side, node: &Node, bound: &[Term]) -> Result<()> {
    let captured = node
        .free()
        .iter()
        .any(|v| bound.iter().any(|b| b.as_variable() == Some(v)));
    if captured {
        return Err(Error::Capture {
            side,
            node: node.clone(),
            bound: bound.to_vec(),
        });
    }
    Ok(())
}

/// Whether the node is one a placeholder of this kind may stand for.
fn kind_accepts(kind: PlaceholderKind, node: &Node) -> bool {
    match (kind, node) {
        (PlaceholderKind::Formula, Node::Formula(_)) => true,
        (PlaceholderKind::Term, Node::Term(_)) => true,
        (PlaceholderKind::Variable, Node::Term(t)) => t.as_variable().is_some(),
        _ => false,
    }
}

// The Matcher compares a rule pattern against a formula from a proof.
// The same algorithm diffs two concrete formulas. Substitution templates rely on that, checking
// the differences between a bound formula and its substituted version.
//
// The result of a comparison is:
//   Ok(empty) when the pattern matches,
//   Ok(mismatches) listing the positions that differ,
//   Err(error) when a side condition on variables fails. This dominates any mismatch.
pub struct Matcher<'a> {
    bindings: &'a mut Bindings,

    // Variables already free in the proof.
    free: &'a [Variable],

    rule_kind: RuleKind,

    // The binders on the path from the root of the pattern to the current position.
    bound: Vec<Term>,
}

impl<'a> Matcher<'a> {
    pub fn new(bindings: &'a mut Bindings, free: &'a [Variable], rule_kind: RuleKind) -> Self {
        Matcher {
            bindings,
            free,
            rule_kind,
            bound: vec![],
        }
    }

    /// Starts matching underneath these binders.
    pub fn with_bound(mut self, bound: Vec<Term>) -> Self {
        self.bound = bound;
        self
    }

    pub fn mismatch(&mut self, pattern: &Formula, candidate: &Formula) -> Result<Vec<Mismatch>> {
        self.formula(pattern, candidate)
    }

    pub fn mismatch_node(&mut self, pattern: &Node, candidate: &Node) -> Result<Vec<Mismatch>> {
        match (pattern, candidate) {
            (Node::Term(p), Node::Term(c)) => self.term(p, c),
            (Node::Formula(p), Node::Formula(c)) => self.formula(p, c),
            _ => Ok(self.here(pattern.clone(), candidate.clone())),
        }
    }

    // A single mismatch at the current position.
    fn here(&self, source: Node, replacement: Node) -> Vec<Mismatch> {
        trace!(source = %source, replacement = %replacement, "mismatch");
        vec![Mismatch {
            source,
            replacement,
            bound: self.bound.clone(),
        }]
    }

    fn term(&mut self, pattern: &Term, candidate: &Term) -> Result<Vec<Mismatch>> {
        match (pattern, candidate) {
            (Term::Placeholder(p), _) => self.placeholder(p, Node::Term(candidate.clone())),
            (Term::Variable(p), Term::Variable(c)) if p == c => Ok(vec![]),
            (Term::Function(pname, pargs), Term::Function(cname, cargs))
                if pname == cname && pargs.len() == cargs.len() =>
            {
                self.terms(pargs, cargs)
            }
            _ => Ok(self.here(pattern.clone().into(), candidate.clone().into())),
        }
    }

    fn terms(&mut self, patterns: &[Term], candidates: &[Term]) -> Result<Vec<Mismatch>> {
        let mut mismatches = vec![];
        for (p, c) in patterns.iter().zip(candidates) {
            mismatches.extend(self.term(p, c)?);
        }
        Ok(mismatches)
    }

    fn formula(&mut self, pattern: &Formula, candidate: &Formula) -> Result<Vec<Mismatch>> {
        match pattern {
            Formula::Letter(_) => {
                if pattern == candidate {
                    Ok(vec![])
                } else {
                    Ok(self.here(pattern.clone().into(), candidate.clone().into()))
                }
            }
            Formula::Placeholder(p) => self.placeholder(p, Node::Formula(candidate.clone())),
            Formula::Subst(template) => self.template(template, candidate),
            Formula::Quantifier(_, bound, _) => {
                self.bound.push(bound.clone());
                let answer = self.compound(pattern, candidate);
                self.bound.pop();
                answer
            }
            Formula::New(_) => {
                self.check_fresh(candidate)?;
                self.compound(pattern, candidate)
            }
            Formula::Let(_, body) => {
                self.check_fresh(candidate)?;
                if self.rule_kind.matches_whole_let() {
                    self.compound(pattern, candidate)
                } else {
                    self.formula(body, candidate)
                }
            }
            _ => self.compound(pattern, candidate),
        }
    }

    // Compound formulas must agree on their outermost operator. If they don't, the whole node is
    // one mismatch and we don't look inside.
    fn compound(&mut self, pattern: &Formula, candidate: &Formula) -> Result<Vec<Mismatch>> {
        if let Formula::Let(_, body) = candidate {
            if !pattern.is_let() {
                return self.compound(pattern, body);
            }
        }
        match (pattern, candidate) {
            (Formula::Relation(pname, pargs), Formula::Relation(cname, cargs))
                if pname == cname && pargs.len() == cargs.len() =>
            {
                self.terms(pargs, cargs)
            }
            (Formula::Prefix(psym, parg), Formula::Prefix(csym, carg)) if psym == csym => {
                self.formula(parg, carg)
            }
            (Formula::Infix(psym, pleft, pright), Formula::Infix(csym, cleft, cright))
                if psym == csym =>
            {
                let mut mismatches = self.formula(pleft, cleft)?;
                mismatches.extend(self.formula(pright, cright)?);
                Ok(mismatches)
            }
            (
                Formula::InfixRelation(psym, pleft, pright),
                Formula::InfixRelation(csym, cleft, cright),
            ) if psym == csym => {
                let mut mismatches = self.term(pleft, cleft)?;
                mismatches.extend(self.term(pright, cright)?);
                Ok(mismatches)
            }
            (Formula::Quantifier(pkind, pbound, pbody), Formula::Quantifier(ckind, cbound, cbody))
                if pkind == ckind =>
            {
                let mut mismatches = self.term(pbound, cbound)?;
                mismatches.extend(self.formula(pbody, cbody)?);
                Ok(mismatches)
            }
            (Formula::New(pvar), Formula::New(cvar)) => self.term(pvar, cvar),
            (Formula::Let(pvar, pbody), Formula::Let(cvar, cbody)) => {
                let mut mismatches = self.term(pvar, cvar)?;
                mismatches.extend(self.formula(pbody, cbody)?);
                Ok(mismatches)
            }
            (Formula::Apply(prule, pargs), Formula::Apply(crule, cargs))
                if prule == crule && pargs.len() == cargs.len() =>
            {
                let mut mismatches = vec![];
                for (p, c) in pargs.iter().zip(cargs) {
                    mismatches.extend(self.mismatch_node(p, c)?);
                }
                Ok(mismatches)
            }
            _ => Ok(self.here(pattern.clone().into(), candidate.clone().into())),
        }
    }

    // The first occurrence of a placeholder binds it.
    // Later occurrences match the bound node against the candidate.
    fn placeholder(&mut self, placeholder: &Placeholder, candidate: Node) -> Result<Vec<Mismatch>> {
        if let Some(bound) = self.bindings.get(placeholder).cloned() {
            return self.mismatch_node(&bound, &candidate);
        }
        if !kind_accepts(placeholder.kind, &candidate) {
            return Ok(self.here(placeholder.to_node(), candidate));
        }
        trace!(placeholder = %placeholder, node = %candidate, "binding placeholder");
        self.bindings.bind(placeholder, &candidate);
        Ok(vec![])
    }

    // The eigenvariable condition: an assumed variable can't already be free in the proof.
    fn check_fresh(&self, candidate: &Formula) -> Result<()> {
        if !self.rule_kind.checks_freshness() {
            return Ok(());
        }
        let Some(var) = candidate.introduced_variable() else {
            return Ok(());
        };
        if let Some(v) = var.as_variable() {
            if self.free.contains(v) {
                let error = Error::NotFresh {
                    variable: var.clone(),
                    free: self.free.to_vec(),
                };
                debug!(error = %error, "freshness check failed");
                return Err(error);
            }
        }
        Ok(())
    }

    fn template(&mut self, template: &SubstTemplate, candidate: &Formula) -> Result<Vec<Mismatch>> {
        let Some(original) = self.bindings.get(&template.pattern).cloned() else {
            trace!(template = %template, node = %candidate, "binding template");
            self.bindings
                .bind(&template.pattern, &Node::Formula(candidate.clone()));
            return Ok(vec![]);
        };
        let candidate = Node::Formula(candidate.clone());
        let answer = match template.kind {
            SubstKind::Some => self.check_replacements(template, &original, &candidate),
            SubstKind::All => self.check_all_replaced(template, &original, &candidate),
            SubstKind::NotIn => self.check_not_in(template, &original, &candidate),
        };
        if let Err(error) = &answer {
            debug!(template = %template, error = %error, "substitution check failed");
        }
        answer
    }

    // Diffs the bound formula against the candidate. Every difference must be a replacement the
    // template declares, and no replaced term may be captured by a binder.
    // Returns the differences that don't agree with the template.
    fn check_replacements(
        &mut self,
        template: &SubstTemplate,
        original: &Node,
        candidate: &Node,
    ) -> Result<Vec<Mismatch>> {
        let diffs = self.mismatch_node(original, candidate)?;
        let mut invalid = vec![];
        for diff in &diffs {
            for pair in &template.pairs {
                // A key that the premises never bound is only constrained by what we observe.
                let source = self.bindings.get(&pair.source).unwrap_or(&diff.source);
                let replacement = pair
                    .replacement
                    .as_ref()
                    .and_then(|r| self.bindings.get(r))
                    .unwrap_or(&diff.replacement);
                check_capture(Side::Source, source, &diff.bound)?;
                check_capture(Side::Replacement, replacement, &diff.bound)?;
                if diff.source != *source || diff.replacement != *replacement {
                    invalid.push(diff.clone());
                }
            }
        }
        Ok(invalid)
    }

    // Like check_replacements, but every occurrence must be replaced, and replaced the same way.
    fn check_all_replaced(
        &mut self,
        template: &SubstTemplate,
        original: &Node,
        candidate: &Node,
    ) -> Result<Vec<Mismatch>> {
        let invalid = self.check_replacements(template, original, candidate)?;
        if !invalid.is_empty() {
            return Ok(invalid);
        }

        // The replacements are all valid. Apply them everywhere and see if we get the candidate.
        let diffs = self.mismatch_node(original, candidate)?;
        let pairs: Vec<(Node, Node)> = diffs
            .into_iter()
            .map(|diff| (diff.source, diff.replacement))
            .collect();
        let substitution: Substitution = pairs.iter().cloned().collect();
        let everywhere = original.subst(&substitution);
        let remaining = self.mismatch_node(&everywhere, candidate)?;
        if !remaining.is_empty() {
            return Err(Error::Incomplete { pairs });
        }
        Ok(vec![])
    }

    fn check_not_in(
        &mut self,
        template: &SubstTemplate,
        original: &Node,
        candidate: &Node,
    ) -> Result<Vec<Mismatch>> {
        let free = original.free();
        for pair in &template.pairs {
            let node = self
                .bindings
                .get(&pair.source)
                .ok_or_else(|| Error::Unbound(pair.source.clone()))?;
            let Some(var) = node.as_variable() else {
                return Err(Error::KindMismatch {
                    placeholder: pair.source.clone(),
                    found: node.clone(),
                });
            };
            if free.contains(var) {
                return Err(Error::FreeIn {
                    variable: var.clone(),
                    free,
                });
            }
        }
        self.mismatch_node(original, candidate)
    }
}

/// Matches a pattern against a candidate in one call.
/// `bound` holds the binders the pattern sits under, usually empty.
pub fn mismatch(
    pattern: &Formula,
    candidate: &Formula,
    bindings: &mut Bindings,
    bound: &[Term],
    free: &[Variable],
    rule_kind: RuleKind,
) -> Result<Vec<Mismatch>> {
    Matcher::new(bindings, free, rule_kind)
        .with_bound(bound.to_vec())
        .mismatch(pattern, candidate)
}
