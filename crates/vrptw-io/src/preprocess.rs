//! Turns a parsed [`RawInstance`] into the split-depot [`PreprocessedGraph`] the ESPPTWC
//! model consumes: Euclidean cost matrix, travel-time matrix, and the arc-feasibility
//! filter.

use vrptw_core::{PreprocessedGraph, RawInstance};

/// Builds the preprocessed graph. Node `0` is the origin depot, node `n + 1` the
/// destination depot; both are copies of customer `0`'s coordinates and time window with
/// demand and service time forced to zero (split-depot convention).
pub fn build_graph(instance: &RawInstance) -> PreprocessedGraph {
    let n = instance.n;
    let node_count = n + 2;

    // index 0..=n maps onto raw customer ids 0..=n directly; index n+1 (destination) is
    // a second copy of the depot's coordinates/window.
    let raw_index = |node: usize| -> usize {
        if node == n + 1 {
            0
        } else {
            node
        }
    };

    let demand: Vec<f64> = (0..node_count)
        .map(|v| if v == 0 || v == n + 1 { 0.0 } else { instance.demand[v] })
        .collect();
    let service: Vec<f64> = (0..node_count)
        .map(|v| if v == 0 || v == n + 1 { 0.0 } else { instance.service[raw_index(v)] })
        .collect();
    let ready: Vec<f64> = (0..node_count).map(|v| instance.ready[raw_index(v)]).collect();
    let due: Vec<f64> = (0..node_count).map(|v| instance.due[raw_index(v)]).collect();

    let euclidean = |i: usize, j: usize| -> f64 {
        let (ri, rj) = (raw_index(i), raw_index(j));
        let dx = instance.x[ri] - instance.x[rj];
        let dy = instance.y[ri] - instance.y[rj];
        truncate_tenths((dx * dx + dy * dy).sqrt())
    };

    let mut cost = vec![vec![None; node_count]; node_count];
    let mut travel_time = vec![vec![None; node_count]; node_count];

    for i in 0..node_count {
        for j in 0..node_count {
            if i == j {
                continue;
            }
            if i == n + 1 {
                continue; // nothing ever leaves the destination depot
            }
            if j == 0 {
                continue; // nothing ever re-enters the origin depot
            }

            let c_ij = euclidean(i, j);
            let tau_ij = c_ij + service[i];

            if ready[i] + service[i] + tau_ij > due[j] {
                continue;
            }
            if demand[i] + demand[j] > instance.capacity {
                continue;
            }

            cost[i][j] = Some(c_ij);
            travel_time[i][j] = Some(tau_ij);
        }
    }

    PreprocessedGraph {
        n,
        capacity: instance.capacity,
        demand,
        service,
        ready,
        due,
        cost,
        travel_time,
    }
}

/// Truncates (not rounds) to one decimal place, matching the Solomon/Homberger benchmark
/// convention used by most published reference solutions.
fn truncate_tenths(v: f64) -> f64 {
    (v * 10.0).trunc() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use vrptw_core::RawInstance;

    fn line_of_three() -> RawInstance {
        // depot at origin, three customers at (1,0), (2,0), (3,0): pairwise distance 1.
        RawInstance {
            name: "line".into(),
            n: 3,
            k: 1,
            capacity: 10.0,
            x: vec![0.0, 1.0, 2.0, 3.0],
            y: vec![0.0, 0.0, 0.0, 0.0],
            demand: vec![0.0, 1.0, 1.0, 1.0],
            ready: vec![0.0, 0.0, 0.0, 0.0],
            due: vec![100.0, 100.0, 100.0, 100.0],
            service: vec![0.0, 0.0, 0.0, 0.0],
        }
    }

    #[test]
    fn split_depot_nodes_mirror_customer_zero() {
        let g = build_graph(&line_of_three());
        assert_eq!(g.node_count(), 5);
        assert_eq!(g.demand[0], 0.0);
        assert_eq!(g.demand[4], 0.0);
        assert_eq!(g.ready[4], g.ready[0]);
    }

    #[test]
    fn cost_matches_euclidean_distance_truncated() {
        let g = build_graph(&line_of_three());
        assert_eq!(g.cost[1][2], Some(1.0));
        assert_eq!(g.cost[0][1], Some(1.0));
    }

    #[test]
    fn arc_filter_drops_entries_into_origin_and_out_of_destination() {
        let g = build_graph(&line_of_three());
        assert!(!g.has_arc(1, 0));
        assert!(!g.has_arc(4, 1));
    }

    #[test]
    fn arc_filter_drops_capacity_infeasible_pairs() {
        let mut inst = line_of_three();
        inst.demand = vec![0.0, 6.0, 6.0, 6.0];
        inst.capacity = 10.0;
        let g = build_graph(&inst);
        assert!(!g.has_arc(1, 2));
    }

    #[test]
    fn arc_filter_drops_window_infeasible_pairs() {
        let mut inst = line_of_three();
        inst.ready = vec![0.0, 90.0, 0.0, 0.0];
        inst.due = vec![100.0, 100.0, 50.0, 100.0];
        let g = build_graph(&inst);
        // ready[1] + service[1] + tau(1,2) = 90 + 0 + 1 = 91 > due[2] = 50
        assert!(!g.has_arc(1, 2));
    }
}
