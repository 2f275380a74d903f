//! Property-based tests over generated propositions
//!
//! These tests use proptest to generate random pointer-logic trees and
//! verify that:
//! 1. The star count agrees with the rendered text
//! 2. The star count is additive over conjunction
//! 3. Rendering and elaboration are deterministic
//! 4. Independent elaborations never share variable identity

use proptest::prelude::*;
use ptrlogic::{count_stars, elaborate, Expr, Prop, Relation, Term};

// =============================================================================
// STRATEGY GENERATORS
// =============================================================================

/// Surface variable names. Alphabetic only, so `*` in rendered text can
/// come from nothing but the dereference constructors.
fn arb_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["p", "q", "r", "x", "y", "ptr"]).prop_map(|s| s.to_string())
}

fn arb_term(depth: u32) -> BoxedStrategy<Term> {
    let leaf = prop_oneof![
        arb_name().prop_map(Term::Var),
        arb_name().prop_map(Term::AddrOf),
        Just(Term::Null),
    ];
    if depth == 0 {
        leaf.boxed()
    } else {
        prop_oneof![
            leaf,
            (arb_term(depth - 1), arb_expr(depth - 1))
                .prop_map(|(t, e)| Term::add_expr(t, e)),
            arb_term(depth - 1).prop_map(Term::addr_of_deref),
            arb_term(depth - 1).prop_map(Term::deref),
        ]
        .boxed()
    }
}

fn arb_expr(depth: u32) -> BoxedStrategy<Expr> {
    let leaf = prop_oneof![
        arb_name().prop_map(Expr::Var),
        (-1000i64..1000i64).prop_map(Expr::Const),
    ];
    if depth == 0 {
        leaf.boxed()
    } else {
        prop_oneof![
            leaf,
            (arb_expr(depth - 1), arb_expr(depth - 1)).prop_map(|(l, r)| Expr::add(l, r)),
            (arb_expr(depth - 1), arb_expr(depth - 1)).prop_map(|(l, r)| Expr::sub(l, r)),
            arb_term(depth - 1).prop_map(Expr::deref),
        ]
        .boxed()
    }
}

fn arb_relation(depth: u32) -> BoxedStrategy<Relation> {
    prop_oneof![
        (arb_term(depth), arb_term(depth)).prop_map(|(l, r)| Relation::TermEq(l, r)),
        (arb_term(depth), arb_term(depth)).prop_map(|(l, r)| Relation::TermLt(l, r)),
        (arb_expr(depth), arb_expr(depth)).prop_map(|(l, r)| Relation::ExprEq(l, r)),
        (arb_expr(depth), arb_expr(depth)).prop_map(|(l, r)| Relation::ExprLt(l, r)),
    ]
    .boxed()
}

fn arb_prop(depth: u32) -> BoxedStrategy<Prop> {
    let leaf = prop_oneof![
        arb_relation(2).prop_map(Prop::Atom),
        arb_relation(2).prop_map(Prop::Negated),
    ];
    if depth == 0 {
        leaf.boxed()
    } else {
        prop_oneof![
            leaf,
            (arb_prop(depth - 1), arb_prop(depth - 1)).prop_map(|(l, r)| Prop::and(l, r)),
        ]
        .boxed()
    }
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    /// Rendering emits `*` for the two dereference-class constructors and
    /// nothing else, so the metric and the text always agree.
    #[test]
    fn star_count_matches_rendered_stars(p in arb_prop(3)) {
        let rendered = p.to_string();
        let stars_in_text = rendered.chars().filter(|&c| c == '*').count();
        prop_assert_eq!(count_stars(&p), stars_in_text);
    }

    /// `count_stars(p /\ q) == count_stars(p) + count_stars(q)`
    #[test]
    fn star_count_is_additive(p in arb_prop(2), q in arb_prop(2)) {
        let conj = Prop::and(p.clone(), q.clone());
        prop_assert_eq!(count_stars(&conj), count_stars(&p) + count_stars(&q));
    }

    /// Repeated renderings of one immutable tree are byte-identical.
    #[test]
    fn rendering_is_deterministic(p in arb_prop(3)) {
        prop_assert_eq!(p.to_string(), p.to_string());
    }

    /// Two independent elaborations agree textually (same rewrite, same
    /// interning order) but never share interned variables.
    #[test]
    fn elaboration_is_deterministic_up_to_renaming(p in arb_prop(3)) {
        let first = elaborate(&p);
        let second = elaborate(&p);
        prop_assert_eq!(first.to_string(), second.to_string());

        let first_ids: Vec<u64> = first.variables().iter().map(|v| v.id()).collect();
        let second_ids: Vec<u64> = second.variables().iter().map(|v| v.id()).collect();
        prop_assert!(first_ids.iter().all(|id| !second_ids.contains(id)));
    }

    /// Elaboration introduces exactly one symbolic variable per distinct
    /// surface name.
    #[test]
    fn elaboration_interns_one_variable_per_name(p in arb_prop(3)) {
        let formula = elaborate(&p);
        let names: Vec<&str> = formula.variables().iter().map(|v| v.name()).collect();
        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        prop_assert_eq!(names.len(), deduped.len());
    }
}
