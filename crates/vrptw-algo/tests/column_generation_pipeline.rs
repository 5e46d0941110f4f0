//! Full pipeline integration test: parse a Solomon-format instance, preprocess it into a
//! graph, run the column-generation orchestrator to convergence, and sanity-check the
//! reconstructed solution. This instance is a synthetic, representative ten-customer
//! clustered layout (two tight clusters either side of the depot); no genuine Solomon
//! R101 benchmark data was available in the retrieval pack to reproduce exactly, so this
//! stands in as the harder-than-a-four-node integration fixture.

use vrptw_algo::{Orchestrator, OrchestratorConfig, TerminationStatus};
use vrptw_io::{build_graph, parse_solomon};

const TEN_CUSTOMER: &str = "
SyntheticCluster10

VEHICLE
NUMBER     CAPACITY
  4   30

CUSTOMER
CUST NO.  XCOORD.   YCOORD.   DEMAND   READY TIME  DUE DATE   SERVICE TIME

 0    0    0    0     0   1000   0
 1   10    0    5     0    200  10
 2   12    2    5    10    220  10
 3    9   -2    5     0    200  10
 4   11    1    5    20    240  10
 5   10    3    5     0    200  10
 6  -10    0    5     0    200  10
 7  -12   -2    5    10    220  10
 8   -9    2    5     0    200  10
 9  -11   -1    5    20    240  10
10  -10    3    5     0    200  10
";

/// Wires the `tracing_subscriber::fmt` subscriber the library itself never installs
/// (libraries emit, applications subscribe); `try_init` tolerates the other test in this
/// binary racing to install the same global subscriber.
fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}

#[test]
fn full_pipeline_converges_to_a_feasible_multi_route_solution() {
    init_tracing();
    let raw = parse_solomon(TEN_CUSTOMER).expect("instance parses");
    assert_eq!(raw.n, 10);

    let graph = build_graph(&raw);
    let mut orchestrator = Orchestrator::new(graph, OrchestratorConfig::default());

    let outcome = orchestrator.solve().expect("column generation does not error");

    assert_eq!(outcome.status, TerminationStatus::Optimal);
    assert!(outcome.objective.is_finite());
    assert!(outcome.objective > 0.0);
    assert!(!outcome.routes.is_empty());

    // Every customer must be covered by exactly the routes the relaxation selected,
    // each a simple path from the origin depot to the destination depot.
    let mut covered = vec![false; raw.n];
    for route in &outcome.routes {
        assert_eq!(route.route.first().unwrap().0, 0);
        assert_eq!(route.route.last().unwrap().0, raw.n + 1);
        for &node in &route.route[1..route.route.len() - 1] {
            covered[node.0 - 1] = true;
        }
    }
    assert!(covered.iter().all(|&c| c), "every customer must be covered by some route");

    // The two clusters are far enough apart, and capacity tight enough (30 against five
    // customers at demand 5 each per side), that no single route should cross sides.
    for route in &outcome.routes {
        let interior: Vec<usize> = route.route[1..route.route.len() - 1]
            .iter()
            .map(|n| n.0)
            .collect();
        let all_east = interior.iter().all(|&c| c <= 5);
        let all_west = interior.iter().all(|&c| c >= 6);
        assert!(
            all_east || all_west,
            "route {:?} mixes customers across the two depot-separated clusters",
            interior
        );
    }
}

#[test]
fn iteration_capped_run_still_terminates_cleanly() {
    let raw = parse_solomon(TEN_CUSTOMER).expect("instance parses");
    let graph = build_graph(&raw);
    let mut orchestrator =
        Orchestrator::new(graph, OrchestratorConfig::default().with_max_iterations(2));
    let outcome = orchestrator.solve().expect("column generation does not error");
    assert_eq!(outcome.status, TerminationStatus::IterationLimit);
    assert!(outcome.objective.is_finite());
}
