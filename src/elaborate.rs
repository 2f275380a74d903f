//! # Elaboration to Integer Arithmetic
//!
//! Compiles a pointer-logic [`Prop`] into a boolean formula over
//! quantifier-free integer arithmetic extended with two uninterpreted
//! `int -> int` functions:
//!
//! - `S` — the stack map, taking a variable's identity to its symbolic
//!   stack-slot address;
//! - `H` — the heap map, taking an address to the value stored there.
//!
//! ## Rewrite rules
//!
//! ```text
//! ⟦x⟧      = H(S(x))        ⟦n⟧      = n
//! ⟦T + E⟧  = ⟦T⟧ + ⟦E⟧      ⟦E + E⟧  = ⟦E⟧ + ⟦E⟧
//! ⟦&x⟧     = S(x)           ⟦E - E⟧  = ⟦E⟧ - ⟦E⟧
//! ⟦&*T⟧    = ⟦T⟧            ⟦*T⟧     = H(⟦T⟧)
//! ⟦*T⟧     = H(⟦T⟧)
//! ⟦NULL⟧   = 0
//! ```
//!
//! Relations map operand-wise onto `==`/`<`; `~R` becomes `Not`, `∧`
//! becomes `And`. Nothing else exists in the grammar, so nothing else is
//! produced.
//!
//! ## Variable identity
//!
//! Each [`Elaborator`] owns a private table from surface name to a fresh
//! symbolic variable, filled lazily on first occurrence and reused on
//! every later occurrence of the same name. Distinct elaborators never
//! share variables, so two independent [`elaborate`] calls agree only up
//! to renaming. To relate several propositions (say, premise and
//! conclusion of an implication), run them through one elaborator:
//!
//! ```rust
//! use ptrlogic::{BoolFormula, Elaborator, Expr, Prop, Relation, Term};
//!
//! let premise = Prop::atom(Relation::TermEq(Term::var("p"), Term::addr_of("q")));
//! let conclusion = Prop::atom(Relation::ExprEq(Expr::deref(Term::var("p")), Expr::var("q")));
//!
//! let mut elab = Elaborator::new();
//! let formula = BoolFormula::implies(elab.elaborate(&premise), elab.elaborate(&conclusion));
//! assert_eq!(
//!     formula.to_string(),
//!     "Implies(H(S(p)) == S(q), H(H(S(p))) == H(S(q)))",
//! );
//! ```

use std::collections::HashMap;

use crate::logic::{Expr, Prop, Relation, Term};
use crate::smt::{BoolFormula, IntTerm, SymVar, UninterpretedFn};

/// Compiles propositions into the integer encoding.
///
/// Holds the per-invocation name-interning table and the two
/// uninterpreted function handles. Create one per logical elaboration;
/// reusing an elaborator deliberately unifies variable names across the
/// propositions it has seen.
#[derive(Debug)]
pub struct Elaborator {
    stack_map: UninterpretedFn,
    heap_map: UninterpretedFn,
    vars: HashMap<String, SymVar>,
}

impl Elaborator {
    /// A fresh elaborator with an empty interning table.
    pub fn new() -> Self {
        Elaborator {
            stack_map: UninterpretedFn::new("S"),
            heap_map: UninterpretedFn::new("H"),
            vars: HashMap::new(),
        }
    }

    /// Compile a proposition into a boolean formula over the integer
    /// encoding.
    ///
    /// Total: the grammar's constructors forbid every ill-typed shape, so
    /// no failure mode exists here.
    pub fn elaborate(&mut self, prop: &Prop) -> BoolFormula {
        match prop {
            Prop::Atom(relation) => self.relation(relation),
            Prop::Negated(relation) => BoolFormula::negation(self.relation(relation)),
            Prop::And(left, right) => {
                BoolFormula::and(self.elaborate(left), self.elaborate(right))
            }
        }
    }

    fn relation(&mut self, relation: &Relation) -> BoolFormula {
        match relation {
            Relation::TermEq(left, right) => {
                BoolFormula::eq(self.term(left), self.term(right))
            }
            Relation::TermLt(left, right) => {
                BoolFormula::lt(self.term(left), self.term(right))
            }
            Relation::ExprEq(left, right) => {
                BoolFormula::eq(self.expr(left), self.expr(right))
            }
            Relation::ExprLt(left, right) => {
                BoolFormula::lt(self.expr(left), self.expr(right))
            }
        }
    }

    fn term(&mut self, term: &Term) -> IntTerm {
        match term {
            Term::Var(name) => {
                let var = self.intern(name);
                self.heap_map.apply(self.stack_map.apply(IntTerm::Var(var)))
            }
            Term::AddExpr(base, offset) => {
                IntTerm::add(self.term(base), self.expr(offset))
            }
            Term::AddrOf(name) => {
                let var = self.intern(name);
                self.stack_map.apply(IntTerm::Var(var))
            }
            Term::AddrOfDeref(inner) => self.term(inner),
            Term::Deref(inner) => {
                let address = self.term(inner);
                self.heap_map.apply(address)
            }
            Term::Null => IntTerm::constant(0),
        }
    }

    fn expr(&mut self, expr: &Expr) -> IntTerm {
        match expr {
            Expr::Var(name) => {
                let var = self.intern(name);
                self.heap_map.apply(self.stack_map.apply(IntTerm::Var(var)))
            }
            Expr::Const(value) => IntTerm::constant(*value),
            Expr::Add(left, right) => IntTerm::add(self.expr(left), self.expr(right)),
            Expr::Sub(left, right) => IntTerm::sub(self.expr(left), self.expr(right)),
            Expr::Deref(term) => {
                let address = self.term(term);
                self.heap_map.apply(address)
            }
        }
    }

    fn intern(&mut self, name: &str) -> SymVar {
        if let Some(var) = self.vars.get(name) {
            return var.clone();
        }
        let var = SymVar::fresh(name);
        tracing::trace!(name, id = var.id(), "interned surface variable");
        self.vars.insert(name.to_string(), var.clone());
        var
    }
}

impl Default for Elaborator {
    fn default() -> Self {
        Self::new()
    }
}

/// Compile a proposition with a fresh, call-scoped interning table.
///
/// Every call interns independently; see [`Elaborator`] for relating
/// several propositions under one table.
pub fn elaborate(prop: &Prop) -> BoolFormula {
    Elaborator::new().elaborate(prop)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elab(prop: &Prop) -> String {
        elaborate(prop).to_string()
    }

    fn atom_eq_term(left: Term, right: Term) -> Prop {
        Prop::atom(Relation::TermEq(left, right))
    }

    #[test]
    fn test_variable_reads_through_both_maps() {
        let p = atom_eq_term(Term::var("p"), Term::var("q"));
        assert_eq!(elab(&p), "H(S(p)) == H(S(q))");
    }

    #[test]
    fn test_addr_of_reads_stack_only() {
        let p = atom_eq_term(Term::var("p"), Term::addr_of("q"));
        assert_eq!(elab(&p), "H(S(p)) == S(q)");
    }

    #[test]
    fn test_addr_of_deref_cancels() {
        let p = atom_eq_term(Term::addr_of_deref(Term::var("p")), Term::var("p"));
        assert_eq!(elab(&p), "H(S(p)) == H(S(p))");
    }

    #[test]
    fn test_deref_wraps_heap_read() {
        let p = atom_eq_term(Term::deref(Term::var("p")), Term::Null);
        assert_eq!(elab(&p), "H(H(S(p))) == 0");
    }

    #[test]
    fn test_pointer_offset_becomes_sum() {
        let p = atom_eq_term(
            Term::add_expr(Term::var("p"), Expr::constant(4)),
            Term::Null,
        );
        assert_eq!(elab(&p), "H(S(p)) + 4 == 0");
    }

    #[test]
    fn test_expression_rules() {
        let p = Prop::atom(Relation::ExprLt(
            Expr::sub(Expr::var("x"), Expr::constant(1)),
            Expr::add(Expr::deref(Term::var("p")), Expr::constant(2)),
        ));
        assert_eq!(elab(&p), "H(S(x)) - 1 < H(H(S(p))) + 2");
    }

    #[test]
    fn test_negation_and_conjunction() {
        let p = Prop::and(
            Prop::negated(Relation::ExprEq(Expr::var("x"), Expr::constant(0))),
            Prop::atom(Relation::ExprLt(Expr::var("x"), Expr::constant(10))),
        );
        assert_eq!(elab(&p), "And(Not(H(S(x)) == 0), H(S(x)) < 10)");
    }

    #[test]
    fn test_same_name_interns_once_per_elaborator() {
        let p = Prop::and(
            atom_eq_term(Term::var("p"), Term::addr_of("q")),
            Prop::atom(Relation::ExprEq(Expr::var("q"), Expr::constant(1))),
        );
        let formula = elaborate(&p);
        let vars = formula.variables();
        // Two names, two variables, whichever category they occur in.
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn test_independent_calls_never_share_variables() {
        let p = atom_eq_term(Term::var("p"), Term::var("q"));
        let first = elaborate(&p);
        let second = elaborate(&p);

        assert_eq!(first.to_string(), second.to_string());

        let first_ids: Vec<u64> = first.variables().iter().map(|v| v.id()).collect();
        let second_ids: Vec<u64> = second.variables().iter().map(|v| v.id()).collect();
        assert!(first_ids.iter().all(|id| !second_ids.contains(id)));
    }
}
