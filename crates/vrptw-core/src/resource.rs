//! Resource values and the capability interface every registered resource implements.
//!
//! A resource is a named, typed quantity attached to a [`crate::label::Label`]: either a
//! scalar (`time`, `load`, `cost`) or a bit-set indexed by customer node (`visited`). The
//! solver never interprets a resource's semantics directly, it only extends, checks
//! feasibility of, and partially-orders [`ResourceValue`]s through the [`Resource`] trait.

use crate::node::{Arc, NodeId};
use fixedbitset::FixedBitSet;
use std::cmp::Ordering;

/// The value a resource takes at a label.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceValue {
    Scalar(f64),
    Visited(FixedBitSet),
}

impl ResourceValue {
    pub fn as_scalar(&self) -> f64 {
        match self {
            ResourceValue::Scalar(v) => *v,
            ResourceValue::Visited(_) => panic!("resource value is a visited-set, not a scalar"),
        }
    }

    pub fn as_visited(&self) -> &FixedBitSet {
        match self {
            ResourceValue::Visited(b) => b,
            ResourceValue::Scalar(_) => panic!("resource value is a scalar, not a visited-set"),
        }
    }

    /// The partial order dominance is built on: `Less` means `self` is everywhere `<=`
    /// `other` (scalars) or a subset of it (visited sets); `Equal` on a tie; `None` when
    /// the two values are incomparable (only possible for visited sets).
    pub fn partial_compare(&self, other: &ResourceValue) -> Option<Ordering> {
        match (self, other) {
            (ResourceValue::Scalar(a), ResourceValue::Scalar(b)) => a.partial_cmp(b),
            (ResourceValue::Visited(a), ResourceValue::Visited(b)) => {
                if a == b {
                    Some(Ordering::Equal)
                } else if is_subset(a, b) {
                    Some(Ordering::Less)
                } else if is_subset(b, a) {
                    Some(Ordering::Greater)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

fn is_subset(a: &FixedBitSet, b: &FixedBitSet) -> bool {
    a.ones().all(|i| b.contains(i))
}

/// A resource's capability interface: extend along an arc, check feasibility at the
/// target node, and produce the initial value at the origin. Implementations must be
/// **monotone**: if `state <= state'` under [`ResourceValue::partial_compare`], then
/// `extend(arc, state) <= extend(arc, state')` for every arc. This is a documented
/// contract the catalog cannot verify; see debug-mode spot checks in `vrptw-algo`.
pub trait Resource: std::fmt::Debug {
    /// Stable name used for catalog lookups (e.g. by the labeling solver's `MinCost`
    /// strategy to find the `cost` resource's current value).
    fn name(&self) -> &'static str;

    /// The value of this resource at the root label, before any arc is traversed.
    fn initial(&self, origin: NodeId) -> ResourceValue;

    /// Applies this resource's extension function along `arc`, given the value at
    /// `arc.from`. Never fails; infeasibility is reported separately by `is_feasible`.
    fn extend(&self, arc: &Arc, before: &ResourceValue) -> ResourceValue;

    /// Feasibility predicate evaluated at `arc.to`. Some predicates (e.g. `visited`)
    /// must inspect the pre-extension value; others (e.g. `time`, `load`) inspect the
    /// post-extension value. Both are passed so each resource can choose.
    fn is_feasible(&self, arc: &Arc, before: &ResourceValue, after: &ResourceValue) -> bool;

    /// Best-effort, opt-in monotonicity spot-check: for a caller-supplied comparable
    /// pair `lo <= hi` (under [`ResourceValue::partial_compare`]), confirms
    /// `extend(arc, lo) <= extend(arc, hi)`. This is a sampling check, not a proof: the
    /// catalog cannot verify monotonicity in general, so callers (typically a model's
    /// debug-mode test harness) exercise this with a handful of synthetic states rather
    /// than on every extension in the hot search loop. The default implementation
    /// trusts the resource; override it to get a real check.
    fn debug_check_monotone(&self, arc: &Arc, lo: &ResourceValue, hi: &ResourceValue) -> Result<(), String> {
        let _ = (arc, lo, hi);
        Ok(())
    }
}
