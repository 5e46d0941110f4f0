//! The one concrete [`LpBackend`] this crate ships (component B's pluggable boundary).
//!
//! `solve_relaxation` goes straight to `clarabel::solver::DefaultSolver` rather than
//! through `good_lp`'s facade: `good_lp::Solution` has no portable dual-value accessor,
//! and the column-generation loop needs a genuine dual vector every iteration. Talking
//! to Clarabel directly costs us the macro-based problem-building convenience but buys
//! back the duals the orchestrator cannot do without. See DESIGN.md for the full
//! rationale.
//!
//! `solve_integer` goes through `good_lp` instead, mirroring the teacher's own
//! `tep::solver::solve_tep`: by default it treats route variables as continuous in
//! `[0, 1]` (documented simplification), and becomes an exact `{0, 1}` MIP solve when
//! this crate's `solver-highs` feature is enabled.

use clarabel::algebra::CscMatrix;
use clarabel::solver::{
    DefaultSettingsBuilder, DefaultSolver, IPSolver, NonnegativeConeT, SolverStatus,
    SupportedConeT, ZeroConeT,
};
use good_lp::{constraint, variable, Expression, ResolutionError, Solution, SolverModel};
use vrptw_core::{ConstraintId, ConstraintSense, LpBackend, LpSolution, VarId, VrptwError, VrptwResult};

struct Row {
    terms: Vec<(VarId, f64)>,
    sense: ConstraintSense,
    rhs: f64,
}

/// Records the problem declaratively (`add_variable`/`add_constraint` never touch the
/// solver); both `solve_relaxation` and `solve_integer` build their own concrete problem
/// from this recording when called, so the same backend instance can be re-solved after
/// `add_column` appends more variables and constraints between column-generation rounds.
pub struct ClarabelBackend {
    lower: Vec<f64>,
    upper: Vec<f64>,
    obj: Vec<f64>,
    rows: Vec<Row>,
}

impl Default for ClarabelBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ClarabelBackend {
    pub fn new() -> Self {
        ClarabelBackend {
            lower: Vec::new(),
            upper: Vec::new(),
            obj: Vec::new(),
            rows: Vec::new(),
        }
    }

    fn num_vars(&self) -> usize {
        self.obj.len()
    }
}

impl LpBackend for ClarabelBackend {
    fn add_variable(&mut self, lo: f64, hi: f64, obj_coeff: f64) -> VarId {
        let id = VarId(self.obj.len());
        self.lower.push(lo);
        self.upper.push(hi);
        self.obj.push(obj_coeff);
        id
    }

    fn add_constraint(
        &mut self,
        terms: &[(VarId, f64)],
        sense: ConstraintSense,
        rhs: f64,
    ) -> ConstraintId {
        let id = ConstraintId(self.rows.len());
        self.rows.push(Row {
            terms: terms.to_vec(),
            sense,
            rhs,
        });
        id
    }

    fn add_term(&mut self, constraint: ConstraintId, var: VarId, coeff: f64) {
        self.rows[constraint.0].terms.push((var, coeff));
    }

    fn solve_relaxation(&mut self) -> VrptwResult<LpSolution> {
        let n = self.num_vars();

        // Partition user rows into equality (ZeroConeT) and inequality (NonnegativeConeT)
        // blocks, recording where each logical constraint landed so duals can be scattered
        // back into the caller's original constraint order regardless of how Clarabel
        // wants its cones grouped.
        let mut eq_entries: Vec<(usize, usize, f64)> = Vec::new();
        let mut eq_rhs: Vec<f64> = Vec::new();
        let mut ineq_entries: Vec<(usize, usize, f64)> = Vec::new();
        let mut ineq_rhs: Vec<f64> = Vec::new();
        let mut physical_row: Vec<(bool, usize)> = Vec::with_capacity(self.rows.len());

        for row in &self.rows {
            match row.sense {
                ConstraintSense::Eq => {
                    let r = eq_rhs.len();
                    for &(var, coeff) in &row.terms {
                        eq_entries.push((r, var.0, coeff));
                    }
                    eq_rhs.push(row.rhs);
                    physical_row.push((true, r));
                }
                ConstraintSense::Le => {
                    let r = ineq_rhs.len();
                    for &(var, coeff) in &row.terms {
                        ineq_entries.push((r, var.0, coeff));
                    }
                    ineq_rhs.push(row.rhs);
                    physical_row.push((false, r));
                }
                ConstraintSense::Ge => {
                    // a^T x >= b  <=>  -a^T x <= -b
                    let r = ineq_rhs.len();
                    for &(var, coeff) in &row.terms {
                        ineq_entries.push((r, var.0, -coeff));
                    }
                    ineq_rhs.push(-row.rhs);
                    physical_row.push((false, r));
                }
            }
        }

        // Variable bounds become two more NonnegativeConeT rows each: x <= hi, -x <= -lo.
        let bound_base = ineq_rhs.len();
        for v in 0..n {
            let r_hi = ineq_rhs.len();
            ineq_entries.push((r_hi, v, 1.0));
            ineq_rhs.push(self.upper[v]);
            let r_lo = ineq_rhs.len();
            ineq_entries.push((r_lo, v, -1.0));
            ineq_rhs.push(-self.lower[v]);
        }
        let _ = bound_base;

        let m_eq = eq_rhs.len();
        let m_ineq = ineq_rhs.len();
        let m = m_eq + m_ineq;

        let mut all_entries: Vec<(usize, usize, f64)> = Vec::with_capacity(eq_entries.len() + ineq_entries.len());
        all_entries.extend(eq_entries.into_iter());
        all_entries.extend(ineq_entries.into_iter().map(|(r, c, v)| (r + m_eq, c, v)));

        let mut b = eq_rhs;
        b.extend(ineq_rhs);

        let p = CscMatrix::zeros((n, n));
        let a = build_csc(m, n, &all_entries);
        let q = self.obj.clone();

        let mut cones: Vec<SupportedConeT<f64>> = Vec::new();
        if m_eq > 0 {
            cones.push(ZeroConeT(m_eq));
        }
        if m_ineq > 0 {
            cones.push(NonnegativeConeT(m_ineq));
        }

        let settings = DefaultSettingsBuilder::default()
            .verbose(false)
            .build()
            .map_err(|e| VrptwError::SolverBackendFailure(format!("{:?}", e)))?;

        let mut solver = DefaultSolver::new(&p, &q, &a, &b, &cones, settings);
        solver.solve();

        match solver.solution.status {
            SolverStatus::Solved | SolverStatus::AlmostSolved => {}
            SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
                return Err(VrptwError::InfeasibleMaster(
                    "clarabel certified primal infeasibility".into(),
                ))
            }
            other => {
                return Err(VrptwError::SolverBackendFailure(format!(
                    "clarabel returned non-optimal status {:?}",
                    other
                )))
            }
        }

        let primals = solver.solution.x.clone();
        let mut duals = vec![0.0; self.rows.len()];
        for (logical_idx, &(is_eq, physical)) in physical_row.iter().enumerate() {
            let z_index = if is_eq { physical } else { m_eq + physical };
            // The >= -> <= rewrite above negates both the row coefficients and the rhs,
            // and that double negation already cancels out: Clarabel's raw z for a
            // rewritten `Ge` row is the shadow price of the original constraint as the
            // caller stated it, with no further sign correction needed.
            duals[logical_idx] = solver.solution.z[z_index];
        }

        Ok(LpSolution {
            objective: solver.solution.obj_val,
            primals,
            duals,
        })
    }

    fn solve_integer(&mut self) -> VrptwResult<LpSolution> {
        solve_integer_via_good_lp(self)
    }
}

fn build_csc(rows: usize, cols: usize, entries: &[(usize, usize, f64)]) -> CscMatrix<f64> {
    let mut by_col: Vec<Vec<(usize, f64)>> = vec![Vec::new(); cols];
    for &(r, c, v) in entries {
        by_col[c].push((r, v));
    }
    let mut colptr = vec![0usize; cols + 1];
    let mut rowval = Vec::new();
    let mut nzval = Vec::new();
    for (c, col) in by_col.iter().enumerate() {
        colptr[c] = rowval.len();
        for &(r, v) in col {
            rowval.push(r);
            nzval.push(v);
        }
    }
    colptr[cols] = rowval.len();
    CscMatrix::new(rows, cols, colptr, rowval, nzval)
}

#[cfg(feature = "solver-highs")]
fn solve_integer_via_good_lp(backend: &mut ClarabelBackend) -> VrptwResult<LpSolution> {
    use good_lp::{variables, Variable, VariableDefinition};

    let mut vars = variables!();
    let handles: Vec<Variable> = (0..backend.num_vars())
        .map(|v| {
            vars.add(
                VariableDefinition::new()
                    .binary()
                    .name(format!("x{v}")),
            )
        })
        .collect();

    let objective: Expression = handles
        .iter()
        .zip(&backend.obj)
        .map(|(&h, &c)| h * c)
        .sum();

    let mut model = vars.minimise(objective).using(good_lp::solvers::highs::highs);
    for row in &backend.rows {
        let expr: Expression = row.terms.iter().map(|&(v, c)| handles[v.0] * c).sum();
        model = model.with(match row.sense {
            ConstraintSense::Le => constraint!(expr <= row.rhs),
            ConstraintSense::Ge => constraint!(expr >= row.rhs),
            ConstraintSense::Eq => constraint!(expr == row.rhs),
        });
    }

    let solution = model
        .solve()
        .map_err(|e: ResolutionError| VrptwError::SolverBackendFailure(format!("{:?}", e)))?;

    let primals: Vec<f64> = handles.iter().map(|&h| solution.value(h)).collect();
    let objective = primals.iter().zip(&backend.obj).map(|(x, c)| x * c).sum();
    Ok(LpSolution {
        objective,
        primals,
        duals: vec![0.0; backend.rows.len()],
    })
}

#[cfg(not(feature = "solver-highs"))]
fn solve_integer_via_good_lp(backend: &mut ClarabelBackend) -> VrptwResult<LpSolution> {
    use good_lp::{variables, Variable};

    let mut vars = variables!();
    let handles: Vec<Variable> = (0..backend.num_vars())
        .map(|v| vars.add(variable().min(backend.lower[v]).max(backend.upper[v])))
        .collect();

    let objective: Expression = handles
        .iter()
        .zip(&backend.obj)
        .map(|(&h, &c)| h * c)
        .sum();

    let mut model = vars
        .minimise(objective)
        .using(good_lp::solvers::clarabel::clarabel);
    for row in &backend.rows {
        let expr: Expression = row.terms.iter().map(|&(v, c)| handles[v.0] * c).sum();
        model = model.with(match row.sense {
            ConstraintSense::Le => constraint!(expr <= row.rhs),
            ConstraintSense::Ge => constraint!(expr >= row.rhs),
            ConstraintSense::Eq => constraint!(expr == row.rhs),
        });
    }

    let solution = model
        .solve()
        .map_err(|e: ResolutionError| VrptwError::SolverBackendFailure(format!("{:?}", e)))?;

    let primals: Vec<f64> = handles
        .iter()
        .map(|&h| solution.value(h).round().clamp(0.0, 1.0))
        .collect();
    let objective = primals.iter().zip(&backend.obj).map(|(x, c)| x * c).sum();
    Ok(LpSolution {
        objective,
        primals,
        duals: vec![0.0; backend.rows.len()],
    })
}
