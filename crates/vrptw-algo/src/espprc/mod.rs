//! The ESPPRC model abstraction (component M) and the generic dominance relation every
//! concrete model shares.

pub mod esptwc;
pub mod resources;

use std::cmp::Ordering;
use vrptw_core::{Label, NodeId};

/// Binds a problem instance to a resource catalog: extension, feasibility, and
/// termination predicates the labeling solver drives. Dominance itself is *not* part of
/// this trait: it is generic over any label's resource vector (see [`compare_labels`])
/// and does not need per-model customization.
pub trait EsprcModel {
    /// The root label at the origin, every resource at its lower bound.
    fn initial_label(&self) -> Label;

    /// Extends `label` to `to` by applying every registered REF in turn, short-circuiting
    /// at the first infeasible resource. Returns `None` on infeasibility.
    fn extend(&self, label: &Label, to: NodeId) -> Option<Label>;

    /// True iff `node` is the destination depot.
    fn is_terminal(&self, node: NodeId) -> bool;

    /// Nodes reachable from `node` over a surviving arc.
    fn successors(&self, node: NodeId) -> &[NodeId];

    /// Replaces the cost map the `cost` resource's REF reads, called by the orchestrator
    /// between pricing iterations with the current dual-adjusted reduced costs.
    fn set_arc_costs(&mut self, reduced_cost: Vec<Vec<f64>>);

    /// Index of the `cost` resource within a label's resource vector, used by the
    /// labeling solver to rank labels under the `MinCost` strategy and to read off the
    /// final minimum reduced cost at the sink.
    fn cost_resource_index(&self) -> usize;

    /// Index of the `time` resource, used by the `MinTime` strategy.
    fn time_resource_index(&self) -> usize;

    /// Index of the `load` resource, used by the `MinLoad` strategy.
    fn load_resource_index(&self) -> usize;
}

/// The partial order dominance is built on, lifted from individual resources
/// ([`vrptw_core::ResourceValue::partial_compare`]) across a label's whole resource
/// vector. `Some(Less)` means `a` is everywhere `<=` `b` with at least one strict
/// resource; `Some(Equal)` means every resource ties; `None` means the labels are
/// incomparable (neither dominates, per different resources disagreeing on direction).
///
/// Labels at different nodes are always incomparable.
pub fn compare_labels(a: &Label, b: &Label) -> Option<Ordering> {
    if a.node != b.node {
        return None;
    }
    let mut overall = Ordering::Equal;
    for (ra, rb) in a.resources.iter().zip(b.resources.iter()) {
        match ra.partial_compare(rb) {
            None => return None,
            Some(Ordering::Equal) => {}
            Some(ord) => {
                if overall == Ordering::Equal {
                    overall = ord;
                } else if overall != ord {
                    return None;
                }
            }
        }
    }
    Some(overall)
}

/// `true` iff `a` strictly dominates `b`: same node, everywhere `<=`, at least one
/// strict. Ties are handled separately by insertion order (see `vrptw_algo::labeling`).
pub fn strictly_dominates(a: &Label, b: &Label) -> bool {
    compare_labels(a, b) == Some(Ordering::Less)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vrptw_core::ResourceValue;

    fn label(node: usize, cost: f64, visited: &[usize]) -> Label {
        let mut bits = fixedbitset::FixedBitSet::with_capacity(8);
        for &v in visited {
            bits.insert(v);
        }
        Label {
            node: NodeId(node),
            resources: vec![ResourceValue::Scalar(cost), ResourceValue::Visited(bits)],
            predecessor: None,
        }
    }

    #[test]
    fn cheaper_and_earlier_label_dominates_otherwise_equal_one() {
        // cost=5,time=10 vs cost=4,time=9 both with load rolled into the scalar slot and
        // identical visited set {1}; the cheaper/earlier one must dominate.
        let worse = label(3, 5.0, &[1]);
        let better = label(3, 4.0, &[1]);
        assert!(strictly_dominates(&better, &worse));
        assert!(!strictly_dominates(&worse, &better));
    }

    #[test]
    fn different_nodes_never_comparable() {
        let a = label(1, 1.0, &[]);
        let b = label(2, 1.0, &[]);
        assert_eq!(compare_labels(&a, &b), None);
    }

    #[test]
    fn identical_resources_tie() {
        let a = label(1, 1.0, &[2]);
        let b = label(1, 1.0, &[2]);
        assert_eq!(compare_labels(&a, &b), Some(Ordering::Equal));
        assert!(!strictly_dominates(&a, &b));
    }

    #[test]
    fn disjoint_visited_sets_are_incomparable_even_with_lower_cost() {
        let a = label(1, 1.0, &[2]);
        let b = label(1, 2.0, &[3]);
        assert_eq!(compare_labels(&a, &b), None);
    }
}
