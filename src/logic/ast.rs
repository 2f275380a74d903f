use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// A pointer-valued term.
///
/// Grammar: `T ::= x | T + E | &x | &*T | *T | NULL`
///
/// `AddrOf` holds the variable *name* rather than a general [`Term`], so a
/// non-variable operand under `&` is unrepresentable. Callers holding an
/// arbitrary term go through [`Term::try_addr_of`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    /// A pointer-valued program variable.
    Var(String),

    /// Pointer plus integer offset: `T + E`.
    AddExpr(Box<Term>, Box<Expr>),

    /// Address of a named variable: `&x`.
    AddrOf(String),

    /// Address of a dereference: `&*T`.
    AddrOfDeref(Box<Term>),

    /// Dereference of a pointer term: `*T`.
    Deref(Box<Term>),

    /// The null pointer constant.
    Null,
}

/// A value-valued (non-pointer) expression.
///
/// Grammar: `E ::= x | n | E + E | E - E | *T`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    /// A value-valued program variable.
    Var(String),

    /// An integer literal.
    Const(i64),

    /// Sum of two expressions.
    Add(Box<Expr>, Box<Expr>),

    /// Difference of two expressions.
    Sub(Box<Expr>, Box<Expr>),

    /// Dereferencing a pointer term yields a value: `*T`.
    Deref(Box<Term>),
}

/// A binary comparison between two operands of the same category.
///
/// Grammar: `R ::= T = T | T < T | E = E | E < E`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    /// Equality between two pointer terms.
    TermEq(Term, Term),

    /// Ordering between two pointer terms.
    TermLt(Term, Term),

    /// Equality between two value expressions.
    ExprEq(Expr, Expr),

    /// Ordering between two value expressions.
    ExprLt(Expr, Expr),
}

/// A proposition over relations.
///
/// Grammar: `P ::= R | ~R | P ∧ P`
///
/// Negation applies only to a relation, never to a sub-proposition, and
/// there is no disjunction. Implication and equivalence live on the solver
/// side (see [`crate::smt::BoolFormula::implies`]), not in this grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Prop {
    /// A bare relation.
    Atom(Relation),

    /// A negated relation: `~R`.
    Negated(Relation),

    /// Conjunction of two propositions.
    And(Box<Prop>, Box<Prop>),
}

impl Term {
    /// A pointer variable.
    pub fn var(name: impl Into<String>) -> Self {
        Term::Var(name.into())
    }

    /// Pointer-plus-offset: `T + E`.
    pub fn add_expr(term: Term, expr: Expr) -> Self {
        Term::AddExpr(Box::new(term), Box::new(expr))
    }

    /// Address of a named variable: `&x`.
    pub fn addr_of(name: impl Into<String>) -> Self {
        Term::AddrOf(name.into())
    }

    /// Checked address-of for callers holding an arbitrary term.
    ///
    /// The grammar only admits `&x`; anything but [`Term::Var`] is an
    /// [`Error::InvalidShape`].
    pub fn try_addr_of(term: Term) -> Result<Self> {
        match term {
            Term::Var(name) => Ok(Term::AddrOf(name)),
            other => Err(Error::InvalidShape {
                expected: "a variable under &".to_string(),
                got: other.to_string(),
            }),
        }
    }

    /// Address of a dereference: `&*T`.
    pub fn addr_of_deref(term: Term) -> Self {
        Term::AddrOfDeref(Box::new(term))
    }

    /// Dereference: `*T`.
    pub fn deref(term: Term) -> Self {
        Term::Deref(Box::new(term))
    }
}

impl Expr {
    /// A value variable.
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    /// An integer literal.
    pub fn constant(value: i64) -> Self {
        Expr::Const(value)
    }

    /// Sum of two expressions.
    pub fn add(left: Expr, right: Expr) -> Self {
        Expr::Add(Box::new(left), Box::new(right))
    }

    /// Difference of two expressions.
    pub fn sub(left: Expr, right: Expr) -> Self {
        Expr::Sub(Box::new(left), Box::new(right))
    }

    /// Value of a dereferenced pointer term: `*T`.
    pub fn deref(term: Term) -> Self {
        Expr::Deref(Box::new(term))
    }
}

impl Prop {
    /// A bare relation.
    pub fn atom(relation: Relation) -> Self {
        Prop::Atom(relation)
    }

    /// A negated relation: `~R`.
    pub fn negated(relation: Relation) -> Self {
        Prop::Negated(relation)
    }

    /// Conjunction of two propositions.
    pub fn and(left: Prop, right: Prop) -> Self {
        Prop::And(Box::new(left), Box::new(right))
    }
}

// Display implementations
//
// The operand of `*` and `&*` is parenthesized iff it is an AddExpr, so a
// trailing offset never reads as part of the enclosing dereference.

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(name) => write!(f, "{}", name),
            Term::AddExpr(term, expr) => write!(f, "{} + {}", term, expr),
            Term::AddrOf(name) => write!(f, "&{}", name),
            Term::AddrOfDeref(term) => {
                if matches!(term.as_ref(), Term::AddExpr(_, _)) {
                    write!(f, "&*({})", term)
                } else {
                    write!(f, "&*{}", term)
                }
            }
            Term::Deref(term) => {
                if matches!(term.as_ref(), Term::AddExpr(_, _)) {
                    write!(f, "*({})", term)
                } else {
                    write!(f, "*{}", term)
                }
            }
            Term::Null => write!(f, "NULL"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(value) => write!(f, "{}", value),
            Expr::Add(left, right) => write!(f, "({} + {})", left, right),
            Expr::Sub(left, right) => write!(f, "({} - {})", left, right),
            Expr::Deref(term) => {
                if matches!(term.as_ref(), Term::AddExpr(_, _)) {
                    write!(f, "*({})", term)
                } else {
                    write!(f, "*{}", term)
                }
            }
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::TermEq(left, right) => write!(f, "({} = {})", left, right),
            Relation::TermLt(left, right) => write!(f, "({} < {})", left, right),
            Relation::ExprEq(left, right) => write!(f, "({} = {})", left, right),
            Relation::ExprLt(left, right) => write!(f, "({} < {})", left, right),
        }
    }
}

impl fmt::Display for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prop::Atom(relation) => write!(f, "{}", relation),
            Prop::Negated(relation) => write!(f, "~{}", relation),
            Prop::And(left, right) => write!(f, "({} /\\ {})", left, right),
        }
    }
}
