//! Unified error type for the VRPTW solver core.
//!
//! [`VrptwError`] collects every fatal condition the core can raise. Iteration and
//! timeout budgets are *not* represented here. Per the orchestrator's contract they are
//! ordinary termination outcomes, not errors (see `vrptw_algo::orchestrator::TerminationStatus`).

use thiserror::Error;

/// Unified error type for instance parsing, model construction, and solving.
#[derive(Error, Debug)]
pub enum VrptwError {
    /// Malformed or inconsistent instance data: bad Solomon syntax, negative demand,
    /// a reversed time window, and similar. Always surfaced before any solver runs.
    #[error("instance error: {0}")]
    InstanceError(String),

    /// A resource-extension function produced a value outside its declared domain, or a
    /// debug-mode monotonicity spot-check failed. Indicates a modeling bug, not bad input.
    #[error("resource misdeclared: {0}")]
    ResourceMisdeclared(String),

    /// The restricted master LP is infeasible even after seeding with trivial routes and
    /// slack variables.
    #[error("master problem infeasible: {0}")]
    InfeasibleMaster(String),

    /// The LP backend returned an error or a non-optimal status.
    #[error("LP backend failure: {0}")]
    SolverBackendFailure(String),

    /// Instance file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results produced by this crate and its dependents.
pub type VrptwResult<T> = Result<T, VrptwError>;

impl From<String> for VrptwError {
    fn from(s: String) -> Self {
        VrptwError::InstanceError(s)
    }
}

impl From<&str> for VrptwError {
    fn from(s: &str) -> Self {
        VrptwError::InstanceError(s.to_string())
    }
}
