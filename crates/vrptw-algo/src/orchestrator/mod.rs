//! The column-generation orchestrator (component O): the outer loop alternating
//! between the restricted master problem and the labeling pricing problem.
//!
//! State machine: `INIT -> MASTER -> PRICING -> (MASTER | DONE | ABORT)`. `INIT` runs
//! once, in [`Orchestrator::new`]; the rest of the states are phases of
//! [`Orchestrator::solve`]'s loop body, not a type-level state machine. The teacher
//! codebase's `AdmmOpfSolver`/`tep::solve_tep` loops are plain `loop { ... }` bodies
//! over a config struct too, not typestate.

use std::time::{Duration, Instant};

use anyhow::Context as _;
use tracing::{debug, info};

use vrptw_core::{NodeId, PreprocessedGraph, VrptwError, VrptwResult};

use crate::espprc::esptwc::EsptwcModel;
use crate::espprc::EsprcModel;
use crate::labeling::{self, LabelSelectionStrategy};
use crate::rmp::{ClarabelBackend, Column, RestrictedMasterProblem};

/// How many improving columns a single `PRICING` phase contributes to the RMP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnsPerIter {
    /// Every non-dominated sink label whose reduced cost is below `-tolerance`.
    All,
    /// At most `n`, taken in increasing order of reduced cost (most negative first).
    Limited(usize),
}

impl Default for ColumnsPerIter {
    fn default() -> Self {
        ColumnsPerIter::All
    }
}

/// Column-generation configuration, builder-style (teacher convention: see
/// `AdmmOpfSolver::with_penalty` / `OpfSolver::with_max_iterations`).
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub max_iterations: usize,
    pub tolerance: f64,
    pub labeling_strategy: LabelSelectionStrategy,
    pub solve_integer_after: bool,
    pub columns_per_iter: ColumnsPerIter,
    pub fleet_size: Option<usize>,
    pub timeout: Option<Duration>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        OrchestratorConfig {
            max_iterations: 100,
            tolerance: 1e-6,
            labeling_strategy: LabelSelectionStrategy::default(),
            solve_integer_after: false,
            columns_per_iter: ColumnsPerIter::default(),
            fleet_size: None,
            timeout: None,
        }
    }
}

impl OrchestratorConfig {
    pub fn with_max_iterations(mut self, v: usize) -> Self {
        self.max_iterations = v;
        self
    }

    pub fn with_tolerance(mut self, v: f64) -> Self {
        self.tolerance = v;
        self
    }

    pub fn with_labeling_strategy(mut self, v: LabelSelectionStrategy) -> Self {
        self.labeling_strategy = v;
        self
    }

    pub fn with_solve_integer_after(mut self, v: bool) -> Self {
        self.solve_integer_after = v;
        self
    }

    pub fn with_columns_per_iter(mut self, v: ColumnsPerIter) -> Self {
        self.columns_per_iter = v;
        self
    }

    pub fn with_fleet_size(mut self, v: usize) -> Self {
        self.fleet_size = Some(v);
        self
    }

    pub fn with_timeout(mut self, v: Duration) -> Self {
        self.timeout = Some(v);
        self
    }
}

/// Why `solve` stopped. `IterationLimit` and `Timeout` are ordinary outcomes, not
/// errors; a caller that wants an error on non-optimal termination checks this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationStatus {
    Optimal,
    IterationLimit,
    Timeout,
}

/// A route paired with the fraction (or, after `solve_integer_after`, the `{0, 1}`
/// count) of it used in the final solution.
#[derive(Debug, Clone)]
pub struct RouteAllocation {
    pub route: Vec<NodeId>,
    pub allocation: f64,
}

#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub objective: f64,
    pub routes: Vec<RouteAllocation>,
    pub status: TerminationStatus,
}

/// Drives the column-generation loop over a fixed [`PreprocessedGraph`], the ESPPTWC
/// pricing model, and a growing [`RestrictedMasterProblem`]. Generic over the LP
/// backend so the loop itself never depends on a concrete solver; `ClarabelBackend` is
/// the only implementation this crate ships.
pub struct Orchestrator<B: vrptw_core::LpBackend = ClarabelBackend> {
    graph: PreprocessedGraph,
    model: EsptwcModel,
    rmp: RestrictedMasterProblem<B>,
    config: OrchestratorConfig,
    iteration: usize,
}

impl Orchestrator<ClarabelBackend> {
    /// `INIT`: builds the ESPPTWC model and a freshly seeded RMP over Clarabel.
    pub fn new(graph: PreprocessedGraph, config: OrchestratorConfig) -> Self {
        Self::with_backend(graph, config, ClarabelBackend::new())
    }
}

impl<B: vrptw_core::LpBackend> Orchestrator<B> {
    pub fn with_backend(graph: PreprocessedGraph, config: OrchestratorConfig, backend: B) -> Self {
        let model = EsptwcModel::new(&graph);
        let mut rmp = RestrictedMasterProblem::new(graph.n, config.fleet_size, backend);
        rmp.seed(&graph);
        info!(n = graph.n, "orchestrator initialized, RMP seeded");
        Orchestrator {
            graph,
            model,
            rmp,
            config,
            iteration: 0,
        }
    }

    pub fn columns(&self) -> &[Column] {
        self.rmp.columns()
    }

    /// Runs `MASTER -> PRICING` rounds to convergence, the iteration budget, or the
    /// configured deadline, whichever comes first.
    pub fn solve(&mut self) -> VrptwResult<SolveOutcome> {
        let deadline_start = Instant::now();

        loop {
            if self.iteration >= self.config.max_iterations {
                info!(iteration = self.iteration, "iteration limit reached");
                return self.finish(TerminationStatus::IterationLimit);
            }
            if let Some(timeout) = self.config.timeout {
                if deadline_start.elapsed() >= timeout {
                    info!(iteration = self.iteration, "timeout reached");
                    return self.finish(TerminationStatus::Timeout);
                }
            }

            // MASTER
            let rmp_solution = self.rmp.solve_relaxation()?;
            debug!(
                iteration = self.iteration,
                objective = rmp_solution.objective,
                columns = self.rmp.columns().len(),
                "solved RMP relaxation"
            );

            let reduced_cost = self.reduced_arc_costs(&rmp_solution.customer_duals);
            self.model.set_arc_costs(reduced_cost);

            // PRICING
            let (arena, outcome) =
                labeling::solve(&self.model, self.config.labeling_strategy, None);
            debug!(
                iteration = self.iteration,
                min_reduced_cost = outcome.min_cost,
                labels = arena.len(),
                "solved pricing problem"
            );

            if outcome.min_cost >= -self.config.tolerance {
                info!(
                    iteration = self.iteration,
                    objective = rmp_solution.objective,
                    "no improving column found, converged"
                );
                return self.finish(TerminationStatus::Optimal);
            }

            let cost_index = self.model.cost_resource_index();
            let mut candidates: Vec<_> = outcome
                .sink
                .iter()
                .copied()
                .filter(|&id| !arena.is_dominated(id))
                .map(|id| (id, arena.get(id).resources[cost_index].as_scalar()))
                .filter(|&(_, cost)| cost < -self.config.tolerance)
                .collect();
            candidates.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());

            let limit = match self.config.columns_per_iter {
                ColumnsPerIter::All => candidates.len(),
                ColumnsPerIter::Limited(k) => k.min(candidates.len()),
            };

            for &(label_id, _) in &candidates[..limit] {
                let path = arena.path(label_id);
                let (cost, usage) = self.true_cost_and_usage(&path)?;
                self.rmp.add_column(path, cost, usage);
            }

            self.iteration += 1;
        }
    }

    /// `c̃_ij = c_ij - π_j` for a customer target `j`; depot targets use `π_j = 0`.
    fn reduced_arc_costs(&self, customer_duals: &[f64]) -> Vec<Vec<f64>> {
        let node_count = self.graph.node_count();
        let n = self.graph.n;
        (0..node_count)
            .map(|i| {
                (0..node_count)
                    .map(|j| {
                        let base = self.graph.cost[i][j].unwrap_or(0.0);
                        let pi_j = if j >= 1 && j <= n {
                            customer_duals[j - 1]
                        } else {
                            0.0
                        };
                        base - pi_j
                    })
                    .collect()
            })
            .collect()
    }

    /// Recomputes a priced path's true (undualized) cost and customer-coverage vector
    /// directly from the preprocessed graph, since the label's own `cost` resource
    /// holds the dual-adjusted reduced cost, not the quantity the master problem needs.
    fn true_cost_and_usage(&self, path: &[NodeId]) -> VrptwResult<(f64, Vec<bool>)> {
        let mut usage = vec![false; self.graph.n];
        let mut cost = 0.0;
        for pair in path.windows(2) {
            let (i, j) = (pair[0].0, pair[1].0);
            let arc_cost = self.graph.cost[i][j]
                .with_context(|| format!("arc ({i}, {j}) missing from preprocessed graph but labeling solver traversed it"))
                .map_err(|e: anyhow::Error| VrptwError::ResourceMisdeclared(e.to_string()))?;
            cost += arc_cost;
            if j >= 1 && j <= self.graph.n {
                usage[j - 1] = true;
            }
        }
        Ok((cost, usage))
    }

    fn finish(&mut self, status: TerminationStatus) -> VrptwResult<SolveOutcome> {
        let solution = if self.config.solve_integer_after {
            self.rmp.solve_integer()?
        } else {
            let rmp_solution = self.rmp.solve_relaxation()?;
            vrptw_core::LpSolution {
                objective: rmp_solution.objective,
                primals: rmp_solution.primals,
                duals: Vec::new(),
            }
        };

        let routes = self
            .rmp
            .columns()
            .iter()
            .zip(solution.primals.iter())
            .filter(|(_, &allocation)| allocation > 1e-9)
            .map(|(column, &allocation)| RouteAllocation {
                route: column.route.clone(),
                allocation,
            })
            .collect();

        Ok(SolveOutcome {
            objective: solution.objective,
            routes,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vrptw_io::{build_graph, parse_solomon};

    fn three_customer_line() -> PreprocessedGraph {
        let text = "
ThreeCustomerLine

VEHICLE
NUMBER     CAPACITY
  2   10

CUSTOMER
CUST NO.  XCOORD.   YCOORD.   DEMAND   READY TIME  DUE DATE   SERVICE TIME

 0   0   0   0   0   100   0
 1   1   0   1   0   100   0
 2   2   0   1   0   100   0
 3   3   0   1   0   100   0
";
        build_graph(&parse_solomon(text).unwrap())
    }

    #[test]
    fn converges_to_the_single_three_customer_route() {
        let graph = three_customer_line();
        let mut orchestrator = Orchestrator::new(graph, OrchestratorConfig::default());
        let outcome = orchestrator.solve().unwrap();
        assert_eq!(outcome.status, TerminationStatus::Optimal);
        assert!((outcome.objective - 4.0).abs() < 1e-6);
        assert_eq!(outcome.routes.len(), 1);
        assert_eq!(
            outcome.routes[0].route,
            vec![NodeId(0), NodeId(1), NodeId(2), NodeId(3), NodeId(4)]
        );
    }

    #[test]
    fn rmp_objective_is_monotone_non_increasing_across_iterations() {
        // The RMP objective must never increase as more columns are priced in: re-run
        // with a tiny iteration cap and confirm the single-iteration objective is >= the
        // fully converged one.
        let graph = three_customer_line();
        let mut capped = Orchestrator::new(
            graph.clone(),
            OrchestratorConfig::default().with_max_iterations(1),
        );
        let capped_outcome = capped.solve().unwrap();

        let mut full = Orchestrator::new(graph, OrchestratorConfig::default());
        let full_outcome = full.solve().unwrap();

        assert!(full_outcome.objective <= capped_outcome.objective + 1e-9);
    }

    #[test]
    fn iteration_limit_of_zero_returns_the_seeded_bound_without_error() {
        let graph = three_customer_line();
        let mut orchestrator = Orchestrator::new(
            graph,
            OrchestratorConfig::default().with_max_iterations(0),
        );
        let outcome = orchestrator.solve().unwrap();
        assert_eq!(outcome.status, TerminationStatus::IterationLimit);
    }

    #[test]
    fn solve_integer_after_rounds_allocations_to_zero_or_one() {
        let graph = three_customer_line();
        let mut orchestrator = Orchestrator::new(
            graph,
            OrchestratorConfig::default().with_solve_integer_after(true),
        );
        let outcome = orchestrator.solve().unwrap();
        for route in &outcome.routes {
            assert!((route.allocation - 1.0).abs() < 1e-6);
        }
    }
}
