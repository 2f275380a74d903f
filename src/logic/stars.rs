//! Dereference metric over propositions.
//!
//! Counts the dereference-class constructors (`*T`, `&*T`) appearing
//! anywhere in a proposition, across both the term and expression
//! categories. Purely syntactic: no evaluation or normalization happens,
//! so `*&*p` counts 2 even though it elaborates to the same thing as `*p`.

use super::ast::{Expr, Prop, Relation, Term};

/// Number of dereference operators (`*`, `&*`) in a proposition.
pub fn count_stars(prop: &Prop) -> usize {
    match prop {
        Prop::Atom(relation) | Prop::Negated(relation) => relation_stars(relation),
        Prop::And(left, right) => count_stars(left) + count_stars(right),
    }
}

fn relation_stars(relation: &Relation) -> usize {
    match relation {
        Relation::TermEq(left, right) | Relation::TermLt(left, right) => {
            term_stars(left) + term_stars(right)
        }
        Relation::ExprEq(left, right) | Relation::ExprLt(left, right) => {
            expr_stars(left) + expr_stars(right)
        }
    }
}

fn term_stars(term: &Term) -> usize {
    match term {
        Term::Var(_) | Term::AddrOf(_) | Term::Null => 0,
        Term::AddExpr(term, expr) => term_stars(term) + expr_stars(expr),
        Term::AddrOfDeref(term) => term_stars(term) + 1,
        Term::Deref(term) => term_stars(term) + 1,
    }
}

fn expr_stars(expr: &Expr) -> usize {
    match expr {
        Expr::Var(_) | Expr::Const(_) => 0,
        Expr::Add(left, right) | Expr::Sub(left, right) => expr_stars(left) + expr_stars(right),
        Expr::Deref(term) => term_stars(term) + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_free_leaves_count_zero() {
        let p = Prop::atom(Relation::ExprEq(Expr::var("q"), Expr::constant(1)));
        assert_eq!(count_stars(&p), 0);

        let q = Prop::atom(Relation::TermEq(Term::var("p"), Term::addr_of("q")));
        assert_eq!(count_stars(&q), 0);
    }

    #[test]
    fn test_each_deref_counts_once() {
        let p = Prop::atom(Relation::ExprEq(
            Expr::deref(Term::var("p")),
            Expr::constant(1),
        ));
        assert_eq!(count_stars(&p), 1);

        let q = Prop::atom(Relation::TermEq(
            Term::addr_of_deref(Term::var("p")),
            Term::Null,
        ));
        assert_eq!(count_stars(&q), 1);
    }

    #[test]
    fn test_nesting_sums_across_categories() {
        // *(*q + 1) in expression position: two stars, one per category level
        let inner = Term::add_expr(Term::deref(Term::var("q")), Expr::constant(1));
        let p = Prop::atom(Relation::ExprEq(Expr::deref(inner), Expr::constant(0)));
        assert_eq!(count_stars(&p), 2);
    }

    #[test]
    fn test_negation_counts_like_atom() {
        let r = Relation::TermLt(Term::deref(Term::var("p")), Term::deref(Term::var("q")));
        assert_eq!(count_stars(&Prop::atom(r.clone())), 2);
        assert_eq!(count_stars(&Prop::negated(r)), 2);
    }

    #[test]
    fn test_conjunction_sums_both_sides() {
        let left = Prop::atom(Relation::ExprEq(
            Expr::deref(Term::var("p")),
            Expr::constant(1),
        ));
        let right = Prop::atom(Relation::TermEq(
            Term::deref(Term::deref(Term::var("q"))),
            Term::Null,
        ));
        let conj = Prop::and(left.clone(), right.clone());
        assert_eq!(
            count_stars(&conj),
            count_stars(&left) + count_stars(&right)
        );
        assert_eq!(count_stars(&conj), 3);
    }
}
