//! The VRPTW pricing and master-problem algorithms: the ESPPRC/ESPPTWC models, the
//! labeling solver, the restricted master problem with its Clarabel-backed LP solve,
//! and the column-generation orchestrator that ties them together.
//!
//! `vrptw-core` supplies the shared vocabulary (nodes, labels, resources, the abstract
//! `LpBackend` trait); `vrptw-io` supplies the preprocessed graph this crate's models
//! consume. Neither of those crates depends on this one.

pub mod espprc;
pub mod labeling;
pub mod orchestrator;
pub mod rmp;

pub use espprc::esptwc::EsptwcModel;
pub use espprc::EsprcModel;
pub use labeling::{CancellationToken, LabelSelectionStrategy, LabelingOutcome};
pub use orchestrator::{
    ColumnsPerIter, Orchestrator, OrchestratorConfig, RouteAllocation, SolveOutcome,
    TerminationStatus,
};
pub use rmp::{ClarabelBackend, Column, RestrictedMasterProblem, RmpSolution};
