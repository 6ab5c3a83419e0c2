use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::kernel::bindings::Bindings;
use crate::kernel::formula::Formula;
use crate::kernel::node::Node;
use crate::kernel::placeholder::{SubstKind, SubstTemplate};
use crate::kernel::substitution::Substitution;
use crate::kernel::term::{Term, Variable};

/// Data supplied with an apply command, for the parts of a conclusion that the premises
/// don't determine.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Witness {
    /// A single term. Universal elimination instantiates with it.
    Term(Term),

    /// A term and the variable that replaces it. Existential introduction abstracts over it.
    Instance { term: Term, variable: Variable },
}

/// Builds the conclusion a rule pattern describes, given the bindings from its premises.
pub fn generate(
    pattern: &Formula,
    bindings: &Bindings,
    witness: Option<&Witness>,
) -> Result<Formula> {
    let answer = match pattern {
        Formula::Quantifier(kind, bound, body) => Formula::Quantifier(
            *kind,
            binder(bound, bindings, witness)?,
            Box::new(generate(body, bindings, witness)?),
        ),
        Formula::Let(var, body) => Formula::Let(
            binder(var, bindings, witness)?,
            Box::new(generate(body, bindings, witness)?),
        ),
        Formula::Subst(template) => generate_template(template, bindings, witness)?,
        _ => pattern.subst(&bindings.to_substitution()),
    };
    debug!(pattern = %pattern, conclusion = %answer, "generated");
    Ok(answer)
}

// A binder comes from the premises when they bound it, and from the witness otherwise.
fn binder(bound: &Term, bindings: &Bindings, witness: Option<&Witness>) -> Result<Term> {
    // A variable written in the pattern itself is part of the conclusion as is.
    let Some(placeholder) = bound.as_placeholder() else {
        return Ok(bound.clone());
    };
    match bindings.get(placeholder) {
        Some(Node::Term(value)) if value.is_variable_like() => Ok(value.clone()),
        Some(found) => Err(Error::KindMismatch {
            placeholder: placeholder.clone(),
            found: found.clone(),
        }),
        None => match witness {
            Some(Witness::Instance { variable, .. }) => Ok(variable.clone().into()),
            _ => Err(Error::MissingWitness("{term: variable}")),
        },
    }
}

fn generate_template(
    template: &SubstTemplate,
    bindings: &Bindings,
    witness: Option<&Witness>,
) -> Result<Formula> {
    let form = match bindings.get_formula(&template.pattern) {
        Some(f) => f.clone(),
        None => Formula::Placeholder(template.pattern.clone()),
    };
    if template.kind == SubstKind::NotIn {
        check_not_in(template, bindings, &form)?;
    }

    let mut substitution = Substitution::new();
    for pair in &template.pairs {
        let source = bindings.get(&pair.source);
        let replacement = match &pair.replacement {
            Some(r) => bindings.get(r),
            None => continue,
        };
        match (source, replacement, witness) {
            // Equality substitution. Both sides come from the premises.
            (Some(s), Some(r), _) => substitution.insert(s.clone(), r.clone()),

            // Existential introduction abstracts a term into a new variable.
            (None, None, Some(Witness::Instance { term, variable })) => {
                substitution.insert(term.clone().into(), Term::from(variable.clone()).into())
            }
            (None, None, _) => return Err(Error::MissingWitness("{term: variable}")),

            // Universal elimination instantiates a variable with a term.
            (Some(s), None, Some(Witness::Term(t))) => {
                substitution.insert(s.clone(), t.clone().into())
            }

            // Universal introduction generalizes a term into a variable.
            (None, Some(r), Some(Witness::Term(t))) => {
                substitution.insert(t.clone().into(), r.clone())
            }

            _ => return Err(Error::MissingWitness("term or variable")),
        }
    }
    Ok(form.subst(&substitution))
}

// The declared variables must not be free in the formula the conclusion is built from.
fn check_not_in(template: &SubstTemplate, bindings: &Bindings, form: &Formula) -> Result<()> {
    let free = form.free();
    for pair in &template.pairs {
        let Some(node) = bindings.get(&pair.source) else {
            return Err(Error::Unbound(pair.source.clone()));
        };
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
    Ok(())
}
