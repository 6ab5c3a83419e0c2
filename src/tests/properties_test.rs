//! Property tests for equality, free variables, substitution and matching on concrete formulas.

use proptest::prelude::*;

use crate::generator::generate;
use crate::kernel::bindings::Bindings;
use crate::kernel::formula::Formula;
use crate::kernel::node::Node;
use crate::kernel::substitution::Substitution;
use crate::kernel::term::{Term, Variable};
use crate::matcher::{mismatch, RuleKind};

fn variable() -> impl Strategy<Value = Variable> {
    prop_oneof![Just("x"), Just("y"), Just("z")].prop_map(Variable::new)
}

fn term() -> impl Strategy<Value = Term> {
    let leaf = prop_oneof![
        variable().prop_map(Term::from),
        prop_oneof![Just("a"), Just("b")].prop_map(Term::constant),
    ];
    leaf.prop_recursive(3, 12, 2, |inner| {
        prop::collection::vec(inner, 1..3).prop_map(|args| Term::function("f", args))
    })
}

fn formula() -> impl Strategy<Value = Formula> {
    let leaf = prop_oneof![
        prop_oneof![Just("p"), Just("q")].prop_map(Formula::letter),
        prop::collection::vec(term(), 0..3).prop_map(|args| Formula::relation("R", args)),
        (term(), term()).prop_map(|(a, b)| Formula::equal(a, b)),
    ];
    leaf.prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(Formula::not),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Formula::and(a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Formula::implies(a, b)),
            (variable(), inner.clone()).prop_map(|(v, body)| Formula::all(v, body)),
            (variable(), inner).prop_map(|(v, body)| Formula::exists(v, body)),
        ]
    })
}

fn diff(pattern: &Formula, candidate: &Formula) -> usize {
    let mut bindings = Bindings::new();
    match mismatch(pattern, candidate, &mut bindings, &[], &[], RuleKind::Other) {
        Ok(mismatches) => mismatches.len(),
        Err(e) => panic!("concrete formulas have no side conditions: {}", e),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn equality_is_reflexive(f in formula()) {
        prop_assert_eq!(&f, &f.clone());
        prop_assert_eq!(diff(&f, &f), 0);
    }

    #[test]
    fn diff_is_empty_exactly_for_equal_formulas(f in formula(), g in formula()) {
        prop_assert_eq!(diff(&f, &g) == 0, f == g);
    }

    #[test]
    fn quantifier_binds_its_variable(v in variable(), body in formula()) {
        prop_assert!(!Formula::all(v.clone(), body.clone()).free().contains(&v));
        prop_assert!(!Formula::exists(v.clone(), body).free().contains(&v));
    }

    #[test]
    fn free_variables_of_a_conjunction(f in formula(), g in formula()) {
        let mut expected = f.free();
        for v in g.free() {
            if !expected.contains(&v) {
                expected.push(v);
            }
        }
        prop_assert_eq!(Formula::and(f, g).free(), expected);
    }

    #[test]
    fn empty_substitution_is_identity(f in formula()) {
        prop_assert_eq!(f.subst(&Substitution::new()), f);
    }

    #[test]
    fn substituting_a_variable_by_itself_is_identity(f in formula(), v in variable()) {
        let node = Node::from(v);
        let s: Substitution = std::iter::once((node.clone(), node)).collect();
        prop_assert_eq!(f.subst(&s), f);
    }

    #[test]
    fn placeholders_generate_what_they_matched(f in formula(), g in formula()) {
        let pattern = Formula::implies(Formula::placeholder("P1"), Formula::placeholder("Q1"));
        let candidate = Formula::implies(f, g);
        let mut bindings = Bindings::new();
        let mismatches = mismatch(&pattern, &candidate, &mut bindings, &[], &[], RuleKind::Other);
        prop_assert_eq!(mismatches, Ok(vec![]));
        prop_assert_eq!(generate(&pattern, &bindings, None), Ok(candidate));
    }
}
