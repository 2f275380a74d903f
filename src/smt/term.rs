use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

// Identity mint for symbolic variables. This is not a registry: nothing is
// ever looked up here, so independent elaborations never unify variables.
static NEXT_SYM_ID: AtomicU64 = AtomicU64::new(0);

/// An integer-sorted symbolic variable.
///
/// Two variables are the same only when they were minted by the same
/// [`SymVar::fresh`] call; the display name carries no identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymVar {
    name: String,
    id: u64,
}

impl SymVar {
    /// Mint a fresh variable with the given display name.
    pub fn fresh(name: impl Into<String>) -> Self {
        SymVar {
            name: name.into(),
            id: NEXT_SYM_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The globally unique identity of this variable.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl fmt::Display for SymVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A unary uninterpreted function over integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UninterpretedFn {
    name: String,
}

impl UninterpretedFn {
    /// Declare an uninterpreted `int -> int` function by name.
    pub fn new(name: impl Into<String>) -> Self {
        UninterpretedFn { name: name.into() }
    }

    /// The function's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply this function to an argument term.
    pub fn apply(&self, arg: IntTerm) -> IntTerm {
        IntTerm::Apply(self.clone(), Box::new(arg))
    }
}

/// An integer-sorted term in the solver's input language.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntTerm {
    /// An integer literal.
    Const(i64),

    /// A symbolic variable.
    Var(SymVar),

    /// Sum of two terms.
    Add(Box<IntTerm>, Box<IntTerm>),

    /// Difference of two terms.
    Sub(Box<IntTerm>, Box<IntTerm>),

    /// Application of a unary uninterpreted function.
    Apply(UninterpretedFn, Box<IntTerm>),
}

impl IntTerm {
    /// An integer literal.
    pub fn constant(value: i64) -> Self {
        IntTerm::Const(value)
    }

    /// Sum of two terms.
    pub fn add(left: IntTerm, right: IntTerm) -> Self {
        IntTerm::Add(Box::new(left), Box::new(right))
    }

    /// Difference of two terms.
    pub fn sub(left: IntTerm, right: IntTerm) -> Self {
        IntTerm::Sub(Box::new(left), Box::new(right))
    }

    fn collect_vars<'a>(&'a self, out: &mut Vec<&'a SymVar>) {
        match self {
            IntTerm::Const(_) => {}
            IntTerm::Var(var) => {
                if !out.iter().any(|v| v.id == var.id) {
                    out.push(var);
                }
            }
            IntTerm::Add(left, right) | IntTerm::Sub(left, right) => {
                left.collect_vars(out);
                right.collect_vars(out);
            }
            IntTerm::Apply(_, arg) => arg.collect_vars(out),
        }
    }
}

impl fmt::Display for IntTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntTerm::Const(value) => write!(f, "{}", value),
            IntTerm::Var(var) => write!(f, "{}", var),
            IntTerm::Add(left, right) => write!(f, "{} + {}", left, right),
            IntTerm::Sub(left, right) => write!(f, "{} - {}", left, right),
            IntTerm::Apply(func, arg) => write!(f, "{}({})", func.name, arg),
        }
    }
}

/// A boolean formula over integer terms.
///
/// `==`, `<`, `Not` and `And` are everything elaboration produces;
/// `Or`/`Implies`/`Iff` and the quantifiers round out the collaborator's
/// connective set for callers composing elaborated formulas (there is no
/// implication in the surface grammar, so `P -> Q` is built here, not
/// there).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoolFormula {
    /// Equality between two integer terms.
    Eq(IntTerm, IntTerm),

    /// Strict ordering between two integer terms.
    Lt(IntTerm, IntTerm),

    /// Logical negation.
    Not(Box<BoolFormula>),

    /// Conjunction.
    And(Box<BoolFormula>, Box<BoolFormula>),

    /// Disjunction.
    Or(Box<BoolFormula>, Box<BoolFormula>),

    /// Implication.
    Implies(Box<BoolFormula>, Box<BoolFormula>),

    /// Equivalence.
    Iff(Box<BoolFormula>, Box<BoolFormula>),

    /// Existential quantification over integer variables.
    Exists(Vec<SymVar>, Box<BoolFormula>),

    /// Universal quantification over integer variables.
    Forall(Vec<SymVar>, Box<BoolFormula>),
}

impl BoolFormula {
    /// `left == right`.
    pub fn eq(left: IntTerm, right: IntTerm) -> Self {
        BoolFormula::Eq(left, right)
    }

    /// `left < right`.
    pub fn lt(left: IntTerm, right: IntTerm) -> Self {
        BoolFormula::Lt(left, right)
    }

    /// `Not(formula)`.
    pub fn negation(formula: BoolFormula) -> Self {
        BoolFormula::Not(Box::new(formula))
    }

    /// `And(left, right)`.
    pub fn and(left: BoolFormula, right: BoolFormula) -> Self {
        BoolFormula::And(Box::new(left), Box::new(right))
    }

    /// `Or(left, right)`.
    pub fn or(left: BoolFormula, right: BoolFormula) -> Self {
        BoolFormula::Or(Box::new(left), Box::new(right))
    }

    /// `Implies(premise, conclusion)`.
    pub fn implies(premise: BoolFormula, conclusion: BoolFormula) -> Self {
        BoolFormula::Implies(Box::new(premise), Box::new(conclusion))
    }

    /// `Iff(left, right)`.
    pub fn iff(left: BoolFormula, right: BoolFormula) -> Self {
        BoolFormula::Iff(Box::new(left), Box::new(right))
    }

    /// `Exists(vars, body)`.
    pub fn exists(vars: Vec<SymVar>, body: BoolFormula) -> Self {
        BoolFormula::Exists(vars, Box::new(body))
    }

    /// `Forall(vars, body)`.
    pub fn forall(vars: Vec<SymVar>, body: BoolFormula) -> Self {
        BoolFormula::Forall(vars, Box::new(body))
    }

    /// Every symbolic variable in the formula, deduplicated by identity,
    /// in first-occurrence order.
    pub fn variables(&self) -> Vec<&SymVar> {
        let mut out = Vec::new();
        self.collect_vars(&mut out);
        out
    }

    fn collect_vars<'a>(&'a self, out: &mut Vec<&'a SymVar>) {
        match self {
            BoolFormula::Eq(left, right) | BoolFormula::Lt(left, right) => {
                left.collect_vars(out);
                right.collect_vars(out);
            }
            BoolFormula::Not(inner) => inner.collect_vars(out),
            BoolFormula::And(left, right)
            | BoolFormula::Or(left, right)
            | BoolFormula::Implies(left, right)
            | BoolFormula::Iff(left, right) => {
                left.collect_vars(out);
                right.collect_vars(out);
            }
            BoolFormula::Exists(vars, body) | BoolFormula::Forall(vars, body) => {
                for var in vars {
                    if !out.iter().any(|v| v.id() == var.id()) {
                        out.push(var);
                    }
                }
                body.collect_vars(out);
            }
        }
    }
}

impl fmt::Display for BoolFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolFormula::Eq(left, right) => write!(f, "{} == {}", left, right),
            BoolFormula::Lt(left, right) => write!(f, "{} < {}", left, right),
            BoolFormula::Not(inner) => write!(f, "Not({})", inner),
            BoolFormula::And(left, right) => write!(f, "And({}, {})", left, right),
            BoolFormula::Or(left, right) => write!(f, "Or({}, {})", left, right),
            BoolFormula::Implies(left, right) => write!(f, "Implies({}, {})", left, right),
            BoolFormula::Iff(left, right) => write!(f, "Iff({}, {})", left, right),
            BoolFormula::Exists(vars, body) => {
                write!(f, "Exists([")?;
                for (i, var) in vars.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", var)?;
                }
                write!(f, "], {})", body)
            }
            BoolFormula::Forall(vars, body) => {
                write!(f, "ForAll([")?;
                for (i, var) in vars.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", var)?;
                }
                write!(f, "], {})", body)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_variables_are_distinct() {
        let a = SymVar::fresh("x");
        let b = SymVar::fresh("x");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.name(), b.name());
        assert_ne!(a, b);
    }

    #[test]
    fn test_uninterpreted_application_display() {
        let s = UninterpretedFn::new("S");
        let h = UninterpretedFn::new("H");
        let p = SymVar::fresh("p");
        let t = h.apply(s.apply(IntTerm::Var(p)));
        assert_eq!(t.to_string(), "H(S(p))");
    }

    #[test]
    fn test_formula_display() {
        let s = UninterpretedFn::new("S");
        let q = SymVar::fresh("q");
        let f = BoolFormula::implies(
            BoolFormula::eq(s.apply(IntTerm::Var(q.clone())), IntTerm::constant(1)),
            BoolFormula::negation(BoolFormula::lt(
                IntTerm::constant(0),
                IntTerm::Var(q),
            )),
        );
        assert_eq!(f.to_string(), "Implies(S(q) == 1, Not(0 < q))");
    }

    #[test]
    fn test_arithmetic_display() {
        let x = SymVar::fresh("x");
        let t = IntTerm::sub(
            IntTerm::add(IntTerm::Var(x), IntTerm::constant(2)),
            IntTerm::constant(1),
        );
        assert_eq!(t.to_string(), "x + 2 - 1");
    }

    #[test]
    fn test_variables_deduplicates_by_identity() {
        let x = SymVar::fresh("x");
        let y = SymVar::fresh("y");
        let f = BoolFormula::and(
            BoolFormula::eq(IntTerm::Var(x.clone()), IntTerm::Var(y.clone())),
            BoolFormula::lt(IntTerm::Var(x.clone()), IntTerm::constant(3)),
        );
        let vars = f.variables();
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[0].id(), x.id());
        assert_eq!(vars[1].id(), y.id());
    }
}
