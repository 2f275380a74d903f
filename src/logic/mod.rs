//! # Pointer-Logic Surface Syntax
//!
//! The four syntactic categories of the pointer calculus, as closed sum
//! types, plus the dereference metric.
//!
//! ## Grammar
//!
//! ```text
//! T ::= x | T + E | &x | &*T | *T | NULL     (pointer terms)
//! E ::= x | n | E + E | E - E | *T           (value expressions)
//! R ::= T = T | T < T | E = E | E < E        (relations)
//! P ::= R | ~R | P ∧ P                       (propositions)
//! ```
//!
//! Terms and expressions are mutually recursive: a term embeds an
//! expression through `T + E`, an expression embeds a term through `*T`.
//! Every constructor takes operands of the right category, so an
//! ill-typed nesting is unrepresentable and both analyses over the
//! grammar are total.
//!
//! ## Example
//!
//! ```rust
//! use ptrlogic::{count_stars, Expr, Prop, Relation, Term};
//!
//! // (p = &q) /\ (q = 1)
//! let p1 = Prop::and(
//!     Prop::atom(Relation::TermEq(Term::var("p"), Term::addr_of("q"))),
//!     Prop::atom(Relation::ExprEq(Expr::var("q"), Expr::constant(1))),
//! );
//!
//! assert_eq!(p1.to_string(), "((p = &q) /\\ (q = 1))");
//! assert_eq!(count_stars(&p1), 0);
//! ```

pub mod ast;
pub mod stars;

pub use ast::{Expr, Prop, Relation, Term};
pub use stars::count_stars;
