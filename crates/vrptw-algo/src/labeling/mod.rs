//! The labeling solver (component S): a frontier-based DP search producing optimal
//! elementary paths with minimum reduced cost, pruned by dominance.

use crate::espprc::{compare_labels, EsprcModel};
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc as StdArc;
use vrptw_core::{Label, LabelArena, LabelId, NodeId};

/// Label-selection strategy controlling frontier pop order. Affects runtime and
/// incumbent tightness, never correctness (every strategy enumerates the same reachable,
/// non-dominated label set before the frontier empties).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSelectionStrategy {
    Fifo,
    Lifo,
    MinTime,
    MinCost,
    MinLoad,
    MinPathLength,
}

impl Default for LabelSelectionStrategy {
    /// `MinCost` converges fastest on Solomon-style instances in practice: it prioritizes
    /// the partial paths most likely to reach the sink with a deeply negative reduced
    /// cost, the quantity the orchestrator actually cares about.
    fn default() -> Self {
        LabelSelectionStrategy::MinCost
    }
}

/// Cooperative cancellation token, checked at every frontier-pop boundary (never
/// mid-extension) per the concurrency model's cancellation contract.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(StdArc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(StdArc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

/// The outcome of a labeling search: every non-dominated label that reached the
/// destination, and the minimum reduced cost among them (`+inf` if the sink is empty).
pub struct LabelingOutcome {
    pub sink: Vec<LabelId>,
    pub min_cost: f64,
}

/// Runs the labeling algorithm described in the data model's main procedure to
/// completion (or until cancelled). `arena` accumulates every label created; callers
/// reconstruct paths via `arena.path(id)`.
pub fn solve(
    model: &dyn EsprcModel,
    strategy: LabelSelectionStrategy,
    cancellation: Option<&CancellationToken>,
) -> (LabelArena, LabelingOutcome) {
    let mut arena = LabelArena::new();
    let mut frontier: VecDeque<LabelId> = VecDeque::new();
    let mut buckets: std::collections::HashMap<NodeId, Vec<LabelId>> = std::collections::HashMap::new();
    let mut sink: Vec<LabelId> = Vec::new();

    let root = model.initial_label();
    let root_node = root.node;
    let root_id = arena.insert(root);
    frontier.push_back(root_id);
    buckets.entry(root_node).or_default().push(root_id);

    let span = tracing::debug_span!("labeling_solve", strategy = ?strategy);
    let _enter = span.enter();

    while let Some(current_id) = pop(&mut frontier, &arena, strategy, model) {
        if let Some(token) = cancellation {
            if token.is_cancelled() {
                break;
            }
        }
        if arena.is_dominated(current_id) {
            continue;
        }

        let current_node = arena.get(current_id).node;
        for &to in model.successors(current_node) {
            let label = arena.get(current_id);
            let mut extended = match model.extend(label, to) {
                Some(l) => l,
                None => continue,
            };
            // The model builds the child's resource vector but has no arena handle to
            // its own parent; the solver owns label identity, so it stitches the tree.
            extended.predecessor = Some(current_id);

            let bucket = buckets.entry(to).or_default();
            if dominated_by_any(&arena, bucket, &extended) {
                continue;
            }

            let new_id = arena.insert(extended);
            remove_dominated(&mut arena, bucket, new_id);
            bucket.push(new_id);

            if model.is_terminal(to) {
                let sink_dominated = dominated_by_any_in(&arena, &sink, new_id);
                if !sink_dominated {
                    remove_dominated_from(&mut arena, &mut sink, new_id);
                    sink.push(new_id);
                }
            } else {
                frontier.push_back(new_id);
            }
        }
    }

    let cost_index = model.cost_resource_index();
    let min_cost = sink
        .iter()
        .filter(|&&id| !arena.is_dominated(id))
        .map(|&id| arena.get(id).resources[cost_index].as_scalar())
        .fold(f64::INFINITY, f64::min);

    tracing::debug!(label_count = arena.len(), sink_size = sink.len(), min_cost, "labeling search complete");

    (arena, LabelingOutcome { sink, min_cost })
}

fn pop(
    frontier: &mut VecDeque<LabelId>,
    arena: &LabelArena,
    strategy: LabelSelectionStrategy,
    model: &dyn EsprcModel,
) -> Option<LabelId> {
    match strategy {
        LabelSelectionStrategy::Fifo => frontier.pop_front(),
        LabelSelectionStrategy::Lifo => frontier.pop_back(),
        LabelSelectionStrategy::MinPathLength => {
            pop_by_key(frontier, arena, |arena, id| path_length(arena, id) as f64)
        }
        LabelSelectionStrategy::MinTime => {
            let idx = model.time_resource_index();
            pop_by_key(frontier, arena, |arena, id| arena.get(id).resources[idx].as_scalar())
        }
        LabelSelectionStrategy::MinCost => {
            let idx = model.cost_resource_index();
            pop_by_key(frontier, arena, |arena, id| arena.get(id).resources[idx].as_scalar())
        }
        LabelSelectionStrategy::MinLoad => {
            let idx = model.load_resource_index();
            pop_by_key(frontier, arena, |arena, id| arena.get(id).resources[idx].as_scalar())
        }
    }
}

fn pop_by_key(
    frontier: &mut VecDeque<LabelId>,
    arena: &LabelArena,
    key: impl Fn(&LabelArena, LabelId) -> f64,
) -> Option<LabelId> {
    let (best_pos, _) = frontier
        .iter()
        .enumerate()
        .min_by(|(_, &a), (_, &b)| key(arena, a).partial_cmp(&key(arena, b)).unwrap_or(Ordering::Equal))?;
    frontier.remove(best_pos)
}

/// Number of arcs from the origin to `id`, counted by walking predecessor pointers.
/// Cheap relative to a full `extend` call, so the `MinPathLength` strategy can afford
/// recomputing it on every pop rather than caching it per label.
fn path_length(arena: &LabelArena, id: LabelId) -> usize {
    let mut len = 0;
    let mut cur = arena.get(id).predecessor;
    while let Some(p) = cur {
        len += 1;
        cur = arena.get(p).predecessor;
    }
    len
}

fn dominated_by_any(arena: &LabelArena, bucket: &[LabelId], candidate: &Label) -> bool {
    bucket.iter().any(|&existing_id| {
        if arena.is_dominated(existing_id) {
            return false;
        }
        matches!(
            compare_labels(arena.get(existing_id), candidate),
            Some(Ordering::Less) | Some(Ordering::Equal)
        )
    })
}

fn dominated_by_any_in(arena: &LabelArena, set: &[LabelId], candidate_id: LabelId) -> bool {
    dominated_by_any(arena, set, arena.get(candidate_id))
}

fn remove_dominated(arena: &mut LabelArena, bucket: &mut Vec<LabelId>, new_id: LabelId) {
    let new_label = arena.get(new_id).clone();
    for &existing_id in bucket.iter() {
        if arena.is_dominated(existing_id) {
            continue;
        }
        if compare_labels(&new_label, arena.get(existing_id)) == Some(Ordering::Less) {
            arena.mark_dominated(existing_id);
        }
    }
    bucket.retain(|&id| !arena.is_dominated(id));
}

fn remove_dominated_from(arena: &mut LabelArena, set: &mut Vec<LabelId>, new_id: LabelId) {
    remove_dominated(arena, set, new_id)
}
