//! Arena-indexed labels: partial-path states in the labeling DP.
//!
//! Labels form a tree rooted at the initial label. Each label stores only its parent
//! pointer, not its full path, so path reconstruction never clones per-label state (the
//! dominant cost center in a naive full-path-per-label implementation).

use crate::node::NodeId;
use crate::resource::ResourceValue;

/// Index of a [`Label`] inside a [`LabelArena`]. Stable for the arena's lifetime; labels
/// are never moved or removed, only marked dominated (see [`LabelArena::mark_dominated`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelId(pub usize);

/// A partial-path state: the current node, the resource vector (in catalog registration
/// order), and a pointer to the parent label.
#[derive(Debug, Clone)]
pub struct Label {
    pub node: NodeId,
    pub resources: Vec<ResourceValue>,
    pub predecessor: Option<LabelId>,
}

/// Owns every label ever created during a labeling search. Labels are appended, never
/// removed; dominance only flips a tombstone bit, since a dominated label may still be an
/// ancestor of a live label's path (the ancestor's *own* dominance was already checked
/// when it was created, so keeping it alive here is always safe).
#[derive(Debug, Default)]
pub struct LabelArena {
    labels: Vec<Label>,
    dominated: Vec<bool>,
}

impl LabelArena {
    pub fn new() -> Self {
        Self {
            labels: Vec::new(),
            dominated: Vec::new(),
        }
    }

    pub fn insert(&mut self, label: Label) -> LabelId {
        let id = LabelId(self.labels.len());
        self.labels.push(label);
        self.dominated.push(false);
        id
    }

    pub fn get(&self, id: LabelId) -> &Label {
        &self.labels[id.0]
    }

    pub fn is_dominated(&self, id: LabelId) -> bool {
        self.dominated[id.0]
    }

    pub fn mark_dominated(&mut self, id: LabelId) {
        self.dominated[id.0] = true;
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Walks predecessor pointers from `id` back to the root, returning the node path
    /// from origin to `id` in traversal order.
    pub fn path(&self, id: LabelId) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        let mut cur = Some(id);
        while let Some(i) = cur {
            let label = self.get(i);
            nodes.push(label.node);
            cur = label.predecessor;
        }
        nodes.reverse();
        nodes
    }
}
