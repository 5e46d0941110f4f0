//! Shared vocabulary for the VRPTW column-generation solver: the node/arc graph
//! primitives, resource values and their capability interface, arena-indexed labels, the
//! unified error type, and the abstract LP backend boundary. No algorithm lives here;
//! see `vrptw-algo` for the labeling solver, restricted master problem, and orchestrator.

pub mod error;
pub mod instance;
pub mod label;
pub mod lp;
pub mod node;
pub mod resource;

pub use error::{VrptwError, VrptwResult};
pub use instance::{PreprocessedGraph, RawInstance};
pub use label::{Label, LabelArena, LabelId};
pub use lp::{ConstraintId, ConstraintSense, LpBackend, LpSolution, VarId};
pub use node::{Arc, NodeId};
pub use resource::{Resource, ResourceValue};
