//! # Solver Term Interface & Built-in Backend
//!
//! The term-building side of the satisfiability collaborator: integer
//! terms, boolean formulas, fresh symbolic variables, and unary
//! uninterpreted functions, plus the [`Solver`] judgment trait and the
//! self-contained [`GroundSolver`] backend.
//!
//! The elaborator builds its output through this interface; any backend
//! implementing [`Solver`] can then judge the result. `Display` on
//! [`IntTerm`] and [`BoolFormula`] renders the diagnostic form used
//! throughout the tests (`H(S(p)) == S(q)`, `And(a, b)`,
//! `Implies(a, b)`).

pub mod solver;
pub mod term;

pub use solver::{GroundSolver, Satisfiability, Solver, Validity};
pub use term::{BoolFormula, IntTerm, SymVar, UninterpretedFn};
