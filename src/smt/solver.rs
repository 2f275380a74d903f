//! # Built-in Ground Decision Procedure
//!
//! The [`Solver`] trait is the crate's boundary to a satisfiability
//! backend: a judgment over a [`BoolFormula`] plus an optional list of
//! asserted hypotheses. [`GroundSolver`] is a self-contained pure-Rust
//! backend for quantifier-free ground formulas, the kind the elaborator
//! produces. No external tooling is required.
//!
//! ## Approach
//!
//! - **NNF/DNF expansion**: the formula is flattened into a disjunction
//!   of literal conjunctions (cubes). Elaborated formulas are small; a
//!   cube cap guards against pathological inputs.
//! - **Congruence closure**: each cube is decided over its ground terms
//!   (constants, symbolic variables, uninterpreted applications, sums
//!   and differences) with constant folding.
//! - **Ordering graph**: strict and non-strict edges from `<` literals,
//!   with implied edges between constant classes; a cycle through a
//!   strict edge is a conflict.
//!
//! ## Verdict policy
//!
//! Verdicts are sound, not complete: `Unsat` only when every cube holds
//! a conflict, `Sat` only when a conflict-free cube lies wholly within
//! ground equality logic (every ordering and arithmetic obligation
//! discharged), and `Unknown` otherwise. Quantified formulas are always
//! `Unknown`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::smt::term::{BoolFormula, IntTerm};

/// Verdict of a satisfiability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Satisfiability {
    /// A satisfying assignment exists.
    Sat,
    /// No satisfying assignment exists.
    Unsat,
    /// The backend could not decide.
    Unknown,
}

/// Verdict of a validity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    /// The formula holds under every assignment consistent with the hypotheses.
    Valid,
    /// A counterexample exists.
    Invalid,
    /// The backend could not decide.
    Unknown,
}

/// A satisfiability backend.
///
/// Implementations decide formulas built through [`crate::smt`]'s term
/// interface. Resource failures (timeouts, exhausted search budgets) are
/// returned as errors and surfaced unchanged to the caller.
pub trait Solver {
    /// Is `formula`, conjoined with all `hypotheses`, satisfiable?
    fn check_sat(
        &self,
        formula: &BoolFormula,
        hypotheses: &[BoolFormula],
    ) -> Result<Satisfiability>;

    /// Does `formula` hold under every assignment consistent with
    /// `hypotheses`?
    ///
    /// Decided by the standard negate-and-check pattern: the formula is
    /// valid iff its negation is unsatisfiable together with the
    /// hypotheses.
    fn check_valid(&self, formula: &BoolFormula, hypotheses: &[BoolFormula]) -> Result<Validity> {
        let negated = BoolFormula::negation(formula.clone());
        Ok(match self.check_sat(&negated, hypotheses)? {
            Satisfiability::Unsat => Validity::Valid,
            Satisfiability::Sat => Validity::Invalid,
            Satisfiability::Unknown => Validity::Unknown,
        })
    }
}

/// The built-in backend for quantifier-free ground formulas.
#[derive(Debug, Clone)]
pub struct GroundSolver {
    /// Maximum number of DNF cubes before giving up.
    max_cubes: usize,
    /// Maximum number of class merges while deciding one cube.
    max_merges: usize,
    /// Optional wall-clock deadline for one check.
    deadline: Option<Duration>,
}

impl GroundSolver {
    /// A solver with default resource limits and no deadline.
    pub fn new() -> Self {
        GroundSolver {
            max_cubes: 4096,
            max_merges: 100_000,
            deadline: None,
        }
    }

    /// Override the cube and merge budgets.
    pub fn with_limits(max_cubes: usize, max_merges: usize) -> Self {
        GroundSolver {
            max_cubes,
            max_merges,
            deadline: None,
        }
    }

    /// Set a wall-clock deadline for each check.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    fn check_deadline(&self, start: Instant) -> Result<()> {
        if let Some(limit) = self.deadline {
            if start.elapsed() >= limit {
                return Err(Error::Timeout(limit));
            }
        }
        Ok(())
    }

    /// Flatten into DNF cubes of literals. `None` means a quantifier was
    /// encountered and the formula is out of this backend's fragment.
    fn dnf(
        &self,
        formula: &BoolFormula,
        positive: bool,
        start: Instant,
    ) -> Result<Option<Vec<Vec<Literal>>>> {
        self.check_deadline(start)?;
        let cubes = match formula {
            BoolFormula::Eq(left, right) => vec![vec![Literal {
                atom: Atom::Eq(left.clone(), right.clone()),
                positive,
            }]],
            BoolFormula::Lt(left, right) => vec![vec![Literal {
                atom: Atom::Lt(left.clone(), right.clone()),
                positive,
            }]],
            BoolFormula::Not(inner) => match self.dnf(inner, !positive, start)? {
                Some(cubes) => cubes,
                None => return Ok(None),
            },
            BoolFormula::And(left, right) if positive => {
                return self.dnf_product(left, true, right, true, start);
            }
            BoolFormula::And(left, right) => {
                return self.dnf_union(left, false, right, false, start);
            }
            BoolFormula::Or(left, right) if positive => {
                return self.dnf_union(left, true, right, true, start);
            }
            BoolFormula::Or(left, right) => {
                return self.dnf_product(left, false, right, false, start);
            }
            BoolFormula::Implies(premise, conclusion) if positive => {
                return self.dnf_union(premise, false, conclusion, true, start);
            }
            BoolFormula::Implies(premise, conclusion) => {
                return self.dnf_product(premise, true, conclusion, false, start);
            }
            BoolFormula::Iff(left, right) => {
                // a <-> b  ==  (a /\ b) \/ (~a /\ ~b); negated, mixed polarities
                let (same, mixed) = if positive {
                    (
                        self.dnf_product(left, true, right, true, start)?,
                        self.dnf_product(left, false, right, false, start)?,
                    )
                } else {
                    (
                        self.dnf_product(left, true, right, false, start)?,
                        self.dnf_product(left, false, right, true, start)?,
                    )
                };
                match (same, mixed) {
                    (Some(mut a), Some(b)) => {
                        a.extend(b);
                        self.cap_cubes(&a)?;
                        a
                    }
                    _ => return Ok(None),
                }
            }
            BoolFormula::Exists(_, _) | BoolFormula::Forall(_, _) => return Ok(None),
        };
        Ok(Some(cubes))
    }

    fn dnf_union(
        &self,
        left: &BoolFormula,
        left_pos: bool,
        right: &BoolFormula,
        right_pos: bool,
        start: Instant,
    ) -> Result<Option<Vec<Vec<Literal>>>> {
        let (a, b) = match (
            self.dnf(left, left_pos, start)?,
            self.dnf(right, right_pos, start)?,
        ) {
            (Some(a), Some(b)) => (a, b),
            _ => return Ok(None),
        };
        let mut cubes = a;
        cubes.extend(b);
        self.cap_cubes(&cubes)?;
        Ok(Some(cubes))
    }

    fn dnf_product(
        &self,
        left: &BoolFormula,
        left_pos: bool,
        right: &BoolFormula,
        right_pos: bool,
        start: Instant,
    ) -> Result<Option<Vec<Vec<Literal>>>> {
        let (a, b) = match (
            self.dnf(left, left_pos, start)?,
            self.dnf(right, right_pos, start)?,
        ) {
            (Some(a), Some(b)) => (a, b),
            _ => return Ok(None),
        };
        let mut cubes = Vec::with_capacity(a.len() * b.len());
        for ca in &a {
            for cb in &b {
                let mut cube = ca.clone();
                cube.extend(cb.iter().cloned());
                cubes.push(cube);
            }
        }
        self.cap_cubes(&cubes)?;
        Ok(Some(cubes))
    }

    fn cap_cubes(&self, cubes: &[Vec<Literal>]) -> Result<()> {
        if cubes.len() > self.max_cubes {
            return Err(Error::SearchLimitExceeded {
                limit: self.max_cubes,
            });
        }
        Ok(())
    }

    fn decide_cube(&self, cube: &[Literal], start: Instant) -> Result<CubeVerdict> {
        let mut cc = Congruence::default();

        // Intern every literal's endpoints, then merge the positive
        // equalities and close under congruence.
        let mut eqs = Vec::new();
        let mut diseqs = Vec::new();
        let mut orders = Vec::new();
        for literal in cube {
            match &literal.atom {
                Atom::Eq(left, right) => {
                    let (l, r) = (cc.intern(left), cc.intern(right));
                    if literal.positive {
                        eqs.push((l, r));
                    } else {
                        diseqs.push((l, r));
                    }
                }
                Atom::Lt(left, right) => {
                    let (l, r) = (cc.intern(left), cc.intern(right));
                    orders.push((l, r, literal.positive));
                }
            }
        }
        for (l, r) in eqs {
            cc.merge(l, r, self.max_merges)?;
        }
        cc.close(self, start)?;

        // Two distinct constants in one class is a conflict.
        let class_consts = match cc.class_constants() {
            Ok(consts) => consts,
            Err(()) => return Ok(CubeVerdict::Conflict),
        };

        for (l, r) in diseqs {
            if cc.find(l) == cc.find(r) {
                return Ok(CubeVerdict::Conflict);
            }
        }

        // Ordering literals: evaluate what constant folding settles, turn
        // the rest into graph edges.
        let mut edges: Vec<Edge> = Vec::new();
        let mut open = false;
        for (l, r, positive) in orders {
            let (lc, rc) = (cc.find(l), cc.find(r));
            let lv = class_consts.get(&lc).copied();
            let rv = class_consts.get(&rc).copied();
            if positive {
                if lc == rc {
                    return Ok(CubeVerdict::Conflict);
                }
                match (lv, rv) {
                    (Some(a), Some(b)) if a < b => {}
                    (Some(_), Some(_)) => return Ok(CubeVerdict::Conflict),
                    _ => {
                        edges.push(Edge {
                            from: lc,
                            to: rc,
                            strict: true,
                        });
                        open = true;
                    }
                }
            } else {
                // ~(l < r), i.e. r <= l
                if lc == rc {
                    continue;
                }
                match (lv, rv) {
                    (Some(a), Some(b)) if a < b => return Ok(CubeVerdict::Conflict),
                    (Some(_), Some(_)) => {}
                    _ => {
                        edges.push(Edge {
                            from: rc,
                            to: lc,
                            strict: false,
                        });
                        open = true;
                    }
                }
            }
        }

        // Implied strict edges between constant classes give the graph
        // transitivity through known values.
        let mut const_classes: Vec<(usize, i64)> =
            class_consts.iter().map(|(&c, &v)| (c, v)).collect();
        const_classes.sort_by_key(|&(_, v)| v);
        for i in 0..const_classes.len() {
            for j in (i + 1)..const_classes.len() {
                if const_classes[i].1 < const_classes[j].1 {
                    edges.push(Edge {
                        from: const_classes[i].0,
                        to: const_classes[j].0,
                        strict: true,
                    });
                }
            }
        }

        if has_strict_cycle(&edges) {
            return Ok(CubeVerdict::Conflict);
        }

        if open || cc.has_unfolded_arith {
            Ok(CubeVerdict::Open)
        } else {
            Ok(CubeVerdict::SatGround)
        }
    }
}

impl Default for GroundSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver for GroundSolver {
    fn check_sat(
        &self,
        formula: &BoolFormula,
        hypotheses: &[BoolFormula],
    ) -> Result<Satisfiability> {
        let start = Instant::now();

        let mut conjoined = formula.clone();
        for hypothesis in hypotheses {
            conjoined = BoolFormula::and(hypothesis.clone(), conjoined);
        }

        let cubes = match self.dnf(&conjoined, true, start)? {
            Some(cubes) => cubes,
            None => {
                tracing::debug!("formula outside the ground fragment, answering unknown");
                return Ok(Satisfiability::Unknown);
            }
        };

        let total = cubes.len();
        let mut open = 0usize;
        for cube in &cubes {
            self.check_deadline(start)?;
            match self.decide_cube(cube, start)? {
                CubeVerdict::SatGround => {
                    tracing::debug!(cubes = total, "found a satisfiable ground cube");
                    return Ok(Satisfiability::Sat);
                }
                CubeVerdict::Conflict => {}
                CubeVerdict::Open => open += 1,
            }
        }

        if open == 0 {
            tracing::debug!(cubes = total, "all cubes conflicting, formula unsatisfiable");
            Ok(Satisfiability::Unsat)
        } else {
            tracing::debug!(cubes = total, open, "undecided cubes remain");
            Ok(Satisfiability::Unknown)
        }
    }
}

#[derive(Debug, Clone)]
struct Literal {
    atom: Atom,
    positive: bool,
}

#[derive(Debug, Clone)]
enum Atom {
    Eq(IntTerm, IntTerm),
    Lt(IntTerm, IntTerm),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CubeVerdict {
    /// A theory conflict was found; the cube is unsatisfiable.
    Conflict,
    /// Conflict-free and wholly within ground equality logic.
    SatGround,
    /// Conflict-free but with undischarged ordering or arithmetic.
    Open,
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    from: usize,
    to: usize,
    strict: bool,
}

/// A cycle through at least one strict edge means some term is strictly
/// below itself.
fn has_strict_cycle(edges: &[Edge]) -> bool {
    let mut adjacency: HashMap<usize, Vec<usize>> = HashMap::new();
    for edge in edges {
        adjacency.entry(edge.from).or_default().push(edge.to);
    }
    for edge in edges.iter().filter(|e| e.strict) {
        // Reachable from the strict edge's head back to its tail?
        let mut stack = vec![edge.to];
        let mut seen = vec![edge.to];
        while let Some(node) = stack.pop() {
            if node == edge.from {
                return true;
            }
            for &next in adjacency.get(&node).into_iter().flatten() {
                if !seen.contains(&next) {
                    seen.push(next);
                    stack.push(next);
                }
            }
        }
    }
    false
}

/// Hash-consed ground term graph with union-find congruence closure.
#[derive(Debug, Default)]
struct Congruence {
    labels: Vec<NodeLabel>,
    children: Vec<Vec<usize>>,
    memo: HashMap<(NodeLabel, Vec<usize>), usize>,
    parent: Vec<usize>,
    merges: usize,
    has_unfolded_arith: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum NodeLabel {
    Const(i64),
    Sym(u64),
    App(String),
    Add,
    Sub,
}

impl Congruence {
    fn node(&mut self, label: NodeLabel, kids: Vec<usize>) -> usize {
        let key = (label.clone(), kids.clone());
        if let Some(&id) = self.memo.get(&key) {
            return id;
        }
        let id = self.labels.len();
        self.labels.push(label);
        self.children.push(kids);
        self.parent.push(id);
        self.memo.insert(key, id);
        id
    }

    fn intern(&mut self, term: &IntTerm) -> usize {
        match term {
            IntTerm::Const(value) => self.node(NodeLabel::Const(*value), vec![]),
            IntTerm::Var(var) => self.node(NodeLabel::Sym(var.id()), vec![]),
            IntTerm::Add(left, right) => {
                let (l, r) = (self.intern(left), self.intern(right));
                let folded = match (self.const_value(l), self.const_value(r)) {
                    (Some(a), Some(b)) => a.checked_add(b),
                    _ => None,
                };
                match folded {
                    Some(sum) => self.node(NodeLabel::Const(sum), vec![]),
                    None => {
                        self.has_unfolded_arith = true;
                        self.node(NodeLabel::Add, vec![l, r])
                    }
                }
            }
            IntTerm::Sub(left, right) => {
                let (l, r) = (self.intern(left), self.intern(right));
                let folded = match (self.const_value(l), self.const_value(r)) {
                    (Some(a), Some(b)) => a.checked_sub(b),
                    _ => None,
                };
                match folded {
                    Some(diff) => self.node(NodeLabel::Const(diff), vec![]),
                    None => {
                        self.has_unfolded_arith = true;
                        self.node(NodeLabel::Sub, vec![l, r])
                    }
                }
            }
            IntTerm::Apply(func, arg) => {
                let a = self.intern(arg);
                self.node(NodeLabel::App(func.name().to_string()), vec![a])
            }
        }
    }

    fn find(&mut self, id: usize) -> usize {
        if self.parent[id] != id {
            let root = self.find(self.parent[id]);
            self.parent[id] = root;
        }
        self.parent[id]
    }

    fn merge(&mut self, a: usize, b: usize, max_merges: usize) -> Result<()> {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra] = rb;
            self.merges += 1;
            if self.merges > max_merges {
                return Err(Error::SearchLimitExceeded { limit: max_merges });
            }
        }
        Ok(())
    }

    /// Merge every pair of nodes with congruent signatures until nothing
    /// changes.
    fn close(&mut self, solver: &GroundSolver, start: Instant) -> Result<()> {
        loop {
            solver.check_deadline(start)?;
            let mut signatures: HashMap<(NodeLabel, Vec<usize>), usize> = HashMap::new();
            let mut pending = Vec::new();
            for id in 0..self.labels.len() {
                let kids: Vec<usize> = self.children[id].clone();
                let kids: Vec<usize> = kids.into_iter().map(|k| self.find(k)).collect();
                let key = (self.labels[id].clone(), kids);
                match signatures.get(&key) {
                    Some(&other) if self.find(other) != self.find(id) => {
                        pending.push((other, id));
                    }
                    Some(_) => {}
                    None => {
                        signatures.insert(key, id);
                    }
                }
            }
            if pending.is_empty() {
                return Ok(());
            }
            for (a, b) in pending {
                self.merge(a, b, solver.max_merges)?;
            }
        }
    }

    fn const_value(&self, id: usize) -> Option<i64> {
        match &self.labels[id] {
            NodeLabel::Const(value) => Some(*value),
            _ => None,
        }
    }

    /// The constant value of each class that contains one. `Err` when a
    /// class holds two distinct constants.
    fn class_constants(&mut self) -> std::result::Result<HashMap<usize, i64>, ()> {
        let mut consts: HashMap<usize, i64> = HashMap::new();
        for id in 0..self.labels.len() {
            let value = match self.const_value(id) {
                Some(value) => value,
                None => continue,
            };
            let root = self.find(id);
            match consts.get(&root) {
                Some(&existing) if existing != value => return Err(()),
                _ => {
                    consts.insert(root, value);
                }
            }
        }
        Ok(consts)
    }
}
