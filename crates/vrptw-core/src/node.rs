//! Graph primitives: node identifiers and the split-depot convention.

use serde::{Deserialize, Serialize};

/// A node identifier. Node `0` is the origin depot; node `N + 1` is the destination
/// depot (see the split-depot convention); `1..=N` are customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ORIGIN: NodeId = NodeId(0);

    pub fn destination(n: usize) -> NodeId {
        NodeId(n + 1)
    }

    pub fn is_customer(self, n: usize) -> bool {
        self.0 >= 1 && self.0 <= n
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed arc `(i, j)` with a base cost and a travel time. Arcs are only ever
/// materialized for pairs the preprocessor's arc filter kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub from: NodeId,
    pub to: NodeId,
    pub cost: f64,
    pub travel_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_is_n_plus_one() {
        assert_eq!(NodeId::destination(10), NodeId(11));
    }

    #[test]
    fn customer_range_excludes_depots() {
        assert!(!NodeId::ORIGIN.is_customer(5));
        assert!(!NodeId::destination(5).is_customer(5));
        assert!(NodeId(3).is_customer(5));
    }
}
