use crate::kernel::formula::{Formula, QuantifierKind};
use crate::kernel::placeholder::{Placeholder, SubstKind, SubstPair, SubstTemplate};
use crate::kernel::term::{Term, Variable};
use crate::matcher::RuleKind;
use crate::rule::{Rule, RuleTable};

pub fn var(name: &str) -> Variable {
    Variable::new(name)
}

pub fn relation(name: &str, args: Vec<Term>) -> Formula {
    Formula::relation(name, args)
}

fn v(name: &str) -> Term {
    Term::variable_placeholder(name)
}

fn f(name: &str) -> Formula {
    Formula::placeholder(name)
}

fn template(kind: SubstKind, pattern: &str, pairs: Vec<SubstPair>) -> Formula {
    match SubstTemplate::new(kind, Placeholder::formula(pattern), pairs) {
        Ok(template) => template.into(),
        Err(e) => panic!("bad template in rule table: {}", e),
    }
}

// P1(v1), the shorthand that names the variable a formula is about.
fn about(pattern: &str, var: &str) -> Formula {
    let template = SubstTemplate::from_argument(
        SubstKind::All,
        Placeholder::formula(pattern),
        &v(var).into(),
    );
    match template {
        Ok(template) => template.into(),
        Err(e) => panic!("bad template in rule table: {}", e),
    }
}

fn quantifier(kind: QuantifierKind, bound: &str, body: Formula) -> Formula {
    match Formula::quantifier(kind, v(bound), body) {
        Ok(f) => f,
        Err(e) => panic!("bad quantifier in rule table: {}", e),
    }
}

/// The natural deduction rules for first-order logic with equality, plus the two assumption
/// rules that introduce variables.
pub fn natural_deduction() -> RuleTable {
    let rules = vec![
        // P1, P1 -> Q1 |- Q1
        Rule::new(
            "ie",
            RuleKind::Other,
            vec![f("P1"), Formula::implies(f("P1"), f("Q1"))],
            f("Q1"),
        ),
        // P1, Q1 |- P1 & Q1
        Rule::new(
            "ci",
            RuleKind::Other,
            vec![f("P1"), f("Q1")],
            Formula::and(f("P1"), f("Q1")),
        ),
        // [New(v1), P1] |- A(v1, P1)
        Rule::new(
            "ai",
            RuleKind::DischargeStep,
            vec![Formula::New(v("v1")), f("P1")],
            quantifier(QuantifierKind::All, "v1", f("P1")),
        ),
        // A(v1, P1(v1)) |- P1{v1:t1}
        Rule::new(
            "ae",
            RuleKind::Other,
            vec![quantifier(QuantifierKind::All, "v1", about("P1", "v1"))],
            template(
                SubstKind::All,
                "P1",
                vec![SubstPair::new(Placeholder::variable("v1"), Placeholder::term("t1"))],
            ),
        ),
        // P1 |- E(v1, P1{t1:v1})
        Rule::new(
            "ei",
            RuleKind::Other,
            vec![f("P1")],
            quantifier(
                QuantifierKind::Exists,
                "v1",
                template(
                    SubstKind::Some,
                    "P1",
                    vec![SubstPair::new(Placeholder::term("t1"), Placeholder::variable("v1"))],
                ),
            ),
        ),
        // E(v1, P1(v1)), [Let(v2, P1{v1:v2}), Q1{v2:None}] |- Q1{v2:None}
        Rule::new(
            "ee",
            RuleKind::DischargeStep,
            vec![
                quantifier(QuantifierKind::Exists, "v1", about("P1", "v1")),
                Formula::Let(
                    v("v2"),
                    Box::new(template(
                        SubstKind::All,
                        "P1",
                        vec![SubstPair::new(
                            Placeholder::variable("v1"),
                            Placeholder::variable("v2"),
                        )],
                    )),
                ),
                template(
                    SubstKind::NotIn,
                    "Q1",
                    vec![SubstPair::absent(Placeholder::variable("v2"))],
                ),
            ],
            template(
                SubstKind::NotIn,
                "Q1",
                vec![SubstPair::absent(Placeholder::variable("v2"))],
            ),
        ),
        // t1 = s1, S1 |- S1{t1:s1}
        Rule::new(
            "sub",
            RuleKind::Other,
            vec![
                Formula::equal(Term::placeholder("t1"), Term::placeholder("s1")),
                f("S1"),
            ],
            template(
                SubstKind::Some,
                "S1",
                vec![SubstPair::new(Placeholder::term("t1"), Placeholder::term("s1"))],
            ),
        ),
        // |- New(v1)
        Rule::new("new", RuleKind::AssumeStep, vec![], Formula::New(v("v1"))),
        // |- Let(v1, P1)
        Rule::new(
            "let",
            RuleKind::AssumeStep,
            vec![],
            Formula::Let(v("v1"), Box::new(f("P1"))),
        ),
    ];
    match RuleTable::from_rules(rules) {
        Ok(table) => table,
        Err(e) => panic!("bad rule table: {}", e),
    }
}

/// Looks up a rule that the test expects to exist.
pub fn rule(table: &RuleTable, name: &str) -> Rule {
    match table.get(name) {
        Some(rule) => rule.clone(),
        None => panic!("no rule named {}", name),
    }
}
