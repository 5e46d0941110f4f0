//! The restricted master problem (component P): a growing set-covering LP over the
//! routes the labeling solver has priced out so far.
//!
//! This module only ever talks to its backend through [`vrptw_core::LpBackend`]; the one
//! concrete backend this crate ships lives in [`clarabel_backend`].

pub mod clarabel_backend;

pub use clarabel_backend::ClarabelBackend;

use vrptw_core::{
    ConstraintId, ConstraintSense, LpBackend, LpSolution, NodeId, PreprocessedGraph, VrptwResult,
};

/// A column: a feasible route from origin to destination depot, its true (undualized)
/// cost, and which customers it covers. Once added to an [`RestrictedMasterProblem`], a
/// column is never removed.
#[derive(Debug, Clone)]
pub struct Column {
    pub route: Vec<NodeId>,
    pub cost: f64,
    /// `usage[i]` is `true` iff customer `i + 1` lies on `route`.
    pub usage: Vec<bool>,
}

/// The result of solving the RMP's LP relaxation: the objective, the primal value of
/// every column variable (same order as [`RestrictedMasterProblem::columns`]), and the
/// dual price of each customer covering constraint, the quantity the orchestrator
/// subtracts from arc costs to price the next column.
pub struct RmpSolution {
    pub objective: f64,
    pub primals: Vec<f64>,
    pub customer_duals: Vec<f64>,
}

/// Penalty on a per-customer slack variable seeded when no trivial single-customer route
/// is time/capacity-feasible. Large enough that the LP never prefers slack over any real
/// route once one is priced in, but finite so the relaxation stays solvable.
const BIG_M: f64 = 1.0e7;

/// Set-covering LP: one variable per known route, one `>=` constraint per customer, an
/// optional fleet-size `<=` constraint, minimizing total route cost.
pub struct RestrictedMasterProblem<B: LpBackend> {
    backend: B,
    n: usize,
    customer_constraints: Vec<ConstraintId>,
    fleet_constraint: Option<ConstraintId>,
    columns: Vec<Column>,
}

impl<B: LpBackend> RestrictedMasterProblem<B> {
    /// Builds an empty RMP over `n` customers, with one covering constraint per
    /// customer and, if `fleet_size` is given, an additional `sum(x_r) <= K` constraint.
    /// No columns exist yet; call [`seed`](Self::seed) before the first `MASTER` phase.
    pub fn new(n: usize, fleet_size: Option<usize>, mut backend: B) -> Self {
        let customer_constraints = (0..n)
            .map(|_| backend.add_constraint(&[], ConstraintSense::Ge, 1.0))
            .collect();
        let fleet_constraint =
            fleet_size.map(|k| backend.add_constraint(&[], ConstraintSense::Le, k as f64));
        RestrictedMasterProblem {
            backend,
            n,
            customer_constraints,
            fleet_constraint,
            columns: Vec::new(),
        }
    }

    /// Seeds a feasible basis: one trivial route `(origin, i, destination)` per
    /// customer `i` where that route survived the preprocessor's arc filter, and a
    /// big-M slack variable (covering only that customer) where it did not. This keeps
    /// the RMP feasible from the very first solve regardless of instance difficulty.
    pub fn seed(&mut self, graph: &PreprocessedGraph) {
        let dest = NodeId::destination(graph.n);
        for i in 1..=graph.n {
            if graph.has_arc(0, i) && graph.has_arc(i, dest.0) {
                let cost = graph.cost[0][i].unwrap() + graph.cost[i][dest.0].unwrap();
                let mut usage = vec![false; graph.n];
                usage[i - 1] = true;
                self.add_column(vec![NodeId::ORIGIN, NodeId(i), dest], cost, usage);
            } else {
                self.add_slack(i - 1);
            }
        }
    }

    fn add_slack(&mut self, customer_index: usize) {
        let var = self.backend.add_variable(0.0, 1.0, BIG_M);
        self.backend
            .add_term(self.customer_constraints[customer_index], var, 1.0);
    }

    /// Registers a new column: one `[0, 1]` variable with objective coefficient `cost`,
    /// a unit coefficient in every customer constraint the route covers, and a unit
    /// coefficient in the fleet constraint if one exists.
    pub fn add_column(&mut self, route: Vec<NodeId>, cost: f64, usage: Vec<bool>) {
        debug_assert_eq!(usage.len(), self.n);
        let var = self.backend.add_variable(0.0, 1.0, cost);
        for (i, &covers) in usage.iter().enumerate() {
            if covers {
                self.backend.add_term(self.customer_constraints[i], var, 1.0);
            }
        }
        if let Some(fleet) = self.fleet_constraint {
            self.backend.add_term(fleet, var, 1.0);
        }
        self.columns.push(Column { route, cost, usage });
    }

    /// Solves the continuous relaxation, scattering the backend's raw dual vector back
    /// into customer order (`customer_duals[i]` is the dual of customer `i + 1`'s
    /// covering constraint, regardless of where the fleet constraint landed).
    pub fn solve_relaxation(&mut self) -> VrptwResult<RmpSolution> {
        let solution = self.backend.solve_relaxation()?;
        let customer_duals = self
            .customer_constraints
            .iter()
            .map(|c| solution.duals[c.0])
            .collect();
        Ok(RmpSolution {
            objective: solution.objective,
            primals: solution.primals,
            customer_duals,
        })
    }

    /// Solves the final `{0, 1}` restoration step over every column accumulated so far.
    pub fn solve_integer(&mut self) -> VrptwResult<LpSolution> {
        self.backend.solve_integer()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }
}
