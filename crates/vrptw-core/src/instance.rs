//! Shared instance data types, produced by `vrptw-io` and consumed by `vrptw-algo`'s
//! ESPPTWC model. Kept in `vrptw-core` so neither crate depends on the other.

/// Raw per-customer arrays parsed directly from a Solomon-format instance file, indexed
/// `0..=n` with index `0` the (unsplit) depot.
#[derive(Debug, Clone)]
pub struct RawInstance {
    pub name: String,
    pub n: usize,
    pub k: usize,
    pub capacity: f64,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub demand: Vec<f64>,
    pub ready: Vec<f64>,
    pub due: Vec<f64>,
    pub service: Vec<f64>,
}

/// The graph the ESPPTWC model consumes: split-depot node count, per-node attributes, and
/// the filtered cost/travel-time maps. Node `0` is the origin depot, node `n + 1` the
/// destination depot; `1..=n` are customers (see [`crate::node::NodeId`]).
#[derive(Debug, Clone)]
pub struct PreprocessedGraph {
    pub n: usize,
    pub capacity: f64,
    pub demand: Vec<f64>,
    pub service: Vec<f64>,
    pub ready: Vec<f64>,
    pub due: Vec<f64>,
    /// `cost[i][j]` is `Some(c_ij)` iff the arc survived the feasibility filter.
    pub cost: Vec<Vec<Option<f64>>>,
    /// `travel_time[i][j]` mirrors `cost`, `None` exactly where `cost` is `None`.
    pub travel_time: Vec<Vec<Option<f64>>>,
}

impl PreprocessedGraph {
    pub fn node_count(&self) -> usize {
        self.n + 2
    }

    pub fn has_arc(&self, i: usize, j: usize) -> bool {
        self.cost[i][j].is_some()
    }
}
