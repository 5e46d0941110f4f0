//! Abstract LP backend capability set (component B).
//!
//! This is the deliberately pluggable boundary: the orchestrator and the restricted
//! master problem only ever talk to an `LpBackend` trait object, never to a concrete
//! solver. `vrptw-algo` supplies the one concrete implementation this repository ships.

use crate::error::VrptwResult;

/// Identifies a variable added via [`LpBackend::add_variable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub usize);

/// Identifies a constraint added via [`LpBackend::add_constraint`], in the order it was
/// added. The restricted master problem relies on this order to map dual values back to
/// customer indices, so backends must preserve it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSense {
    Le,
    Eq,
    Ge,
}

/// The result of a successful solve: primal values indexed by [`VarId`], dual values
/// indexed by [`ConstraintId`] (constraint-order, not customer-order; callers map).
#[derive(Debug, Clone)]
pub struct LpSolution {
    pub objective: f64,
    pub primals: Vec<f64>,
    pub duals: Vec<f64>,
}

/// Abstract capability set a restricted master problem needs from an LP/MIP solver.
pub trait LpBackend {
    /// Adds a continuous variable bounded to `[lo, hi]` with the given objective
    /// coefficient (minimization sense is fixed for this crate's master problem).
    fn add_variable(&mut self, lo: f64, hi: f64, obj_coeff: f64) -> VarId;

    /// Adds `sum(coeff * var) <sense> rhs`.
    fn add_constraint(
        &mut self,
        terms: &[(VarId, f64)],
        sense: ConstraintSense,
        rhs: f64,
    ) -> ConstraintId;

    /// Appends `coeff * var` to an already-added constraint's left-hand side.
    ///
    /// The restricted master problem declares one covering constraint per customer
    /// before any column exists, then grows each constraint's coefficient row one term
    /// at a time as `add_column` brings in routes that happen to cover that customer.
    fn add_term(&mut self, constraint: ConstraintId, var: VarId, coeff: f64);

    /// Solves the continuous LP relaxation, returning primal and dual values.
    fn solve_relaxation(&mut self) -> VrptwResult<LpSolution>;

    /// Solves with every variable restricted to `{0, 1}`, for the final restoration step.
    fn solve_integer(&mut self) -> VrptwResult<LpSolution>;
}
