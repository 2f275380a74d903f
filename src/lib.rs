//! # ptrlogic - A Pointer-Logic Front End
//!
//! A typed abstract syntax for a C-like pointer calculus together with
//! two analyses over it: a structural dereference metric and an
//! elaboration into quantifier-free integer arithmetic over two
//! uninterpreted functions (a stack-location map `S` and a heap-contents
//! map `H`). The elaborated formula is handed to a pluggable
//! satisfiability backend; a conservative built-in backend ships with the
//! crate.
//!
//! ## Architecture
//!
//! ```text
//! Prop ──► count_stars ──► usize
//!   │
//!   └────► Elaborator ──► BoolFormula ──► Solver ──► Sat / Unsat / Unknown
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use ptrlogic::{count_stars, elaborate, Expr, Prop, Relation, Term};
//!
//! // (p = &q) /\ (q = 1)
//! let p1 = Prop::and(
//!     Prop::atom(Relation::TermEq(Term::var("p"), Term::addr_of("q"))),
//!     Prop::atom(Relation::ExprEq(Expr::var("q"), Expr::constant(1))),
//! );
//!
//! assert_eq!(p1.to_string(), "((p = &q) /\\ (q = 1))");
//! assert_eq!(count_stars(&p1), 0);
//! assert_eq!(elaborate(&p1).to_string(), "And(H(S(p)) == S(q), H(S(q)) == 1)");
//! ```
//!
//! ## Checking validity
//!
//! ```rust
//! use ptrlogic::{
//!     BoolFormula, Elaborator, Expr, GroundSolver, Prop, Relation, Solver,
//!     Term, Validity,
//! };
//!
//! // (p = &q) /\ (q = 1)  implies  *p = 1
//! let premise = Prop::and(
//!     Prop::atom(Relation::TermEq(Term::var("p"), Term::addr_of("q"))),
//!     Prop::atom(Relation::ExprEq(Expr::var("q"), Expr::constant(1))),
//! );
//! let conclusion = Prop::atom(Relation::ExprEq(
//!     Expr::deref(Term::var("p")),
//!     Expr::constant(1),
//! ));
//!
//! // One elaborator, so `p` and `q` mean the same thing on both sides.
//! let mut elab = Elaborator::new();
//! let claim = BoolFormula::implies(elab.elaborate(&premise), elab.elaborate(&conclusion));
//!
//! let solver = GroundSolver::new();
//! assert_eq!(solver.check_valid(&claim, &[]).unwrap(), Validity::Valid);
//! ```
//!
//! ## Design
//!
//! - The four syntactic categories are closed sum types; every
//!   constructor demands operands of the right category, so ill-typed
//!   trees are unrepresentable and both analyses are total.
//! - Counting and elaboration are pure, synchronous folds over immutable
//!   trees. The only per-call state is the elaborator's private
//!   name-interning table, so independent elaborations may run on
//!   independent threads without coordination.
//! - The built-in solver answers `Unknown` rather than guess; its
//!   resource limits surface as [`Error`] values, unchanged.

/// Version of the ptrlogic crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod elaborate;
pub mod error;
pub mod logic;
pub mod smt;

// Re-export main types
pub use elaborate::{elaborate, Elaborator};
pub use error::{Error, Result};
pub use logic::{count_stars, Expr, Prop, Relation, Term};
pub use smt::{
    BoolFormula, GroundSolver, IntTerm, Satisfiability, Solver, SymVar, UninterpretedFn, Validity,
};
