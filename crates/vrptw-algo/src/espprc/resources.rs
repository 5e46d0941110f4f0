//! Concrete [`Resource`] implementations for the ESPPTWC model's four resources.
//!
//! Each struct here closes over exactly the per-node data its REF and feasibility
//! predicate need; [`EsptwcModel`](super::esptwc::EsptwcModel) holds them as a
//! `Vec<Box<dyn Resource>>` and iterates the vector in registration order for both
//! extension and feasibility checking, per the catalog's short-circuit contract. Adding
//! a fifth resource (e.g. a driver break window) means writing one more struct here and
//! pushing it into that vector; the labeling solver and the dominance comparator never
//! change.

use std::cell::RefCell;
use std::rc::Rc;

use fixedbitset::FixedBitSet;
use vrptw_core::{Arc, NodeId, Resource, ResourceValue};

/// `time`: `t_j = max(a_j, t_i + s_i + tau_ij)`; feasible iff `t_j <= b_j`.
#[derive(Debug)]
pub struct TimeResource {
    ready: Vec<f64>,
    due: Vec<f64>,
    service: Vec<f64>,
    travel_time: Vec<Vec<f64>>,
}

impl TimeResource {
    pub fn new(ready: Vec<f64>, due: Vec<f64>, service: Vec<f64>, travel_time: Vec<Vec<f64>>) -> Self {
        TimeResource {
            ready,
            due,
            service,
            travel_time,
        }
    }
}

impl Resource for TimeResource {
    fn name(&self) -> &'static str {
        "time"
    }

    fn initial(&self, origin: NodeId) -> ResourceValue {
        ResourceValue::Scalar(self.ready[origin.0])
    }

    fn extend(&self, arc: &Arc, before: &ResourceValue) -> ResourceValue {
        let (i, j) = (arc.from.0, arc.to.0);
        let t_i = before.as_scalar();
        let tau_ij = self.travel_time[i][j];
        ResourceValue::Scalar(self.ready[j].max(t_i + self.service[i] + tau_ij))
    }

    fn is_feasible(&self, arc: &Arc, _before: &ResourceValue, after: &ResourceValue) -> bool {
        after.as_scalar() <= self.due[arc.to.0]
    }

    fn debug_check_monotone(&self, arc: &Arc, lo: &ResourceValue, hi: &ResourceValue) -> Result<(), String> {
        scalar_extend_is_monotone(self, arc, lo, hi)
    }
}

/// `load`: `q_j = q_i + d_j`; feasible iff `q_j <= Q`.
#[derive(Debug)]
pub struct LoadResource {
    demand: Vec<f64>,
    capacity: f64,
}

impl LoadResource {
    pub fn new(demand: Vec<f64>, capacity: f64) -> Self {
        LoadResource { demand, capacity }
    }
}

impl Resource for LoadResource {
    fn name(&self) -> &'static str {
        "load"
    }

    fn initial(&self, _origin: NodeId) -> ResourceValue {
        ResourceValue::Scalar(0.0)
    }

    fn extend(&self, arc: &Arc, before: &ResourceValue) -> ResourceValue {
        ResourceValue::Scalar(before.as_scalar() + self.demand[arc.to.0])
    }

    fn is_feasible(&self, _arc: &Arc, _before: &ResourceValue, after: &ResourceValue) -> bool {
        after.as_scalar() <= self.capacity
    }

    fn debug_check_monotone(&self, arc: &Arc, lo: &ResourceValue, hi: &ResourceValue) -> Result<(), String> {
        scalar_extend_is_monotone(self, arc, lo, hi)
    }
}

/// `cost`: `c_j = c_i + c~_ij`, no window. `c~` is the current dual-adjusted reduced
/// cost, replaced wholesale by the orchestrator between pricing rounds via the shared
/// cell rather than through the `Resource` trait (not every resource needs an external
/// mutation hook, so it isn't part of the trait's capability set).
#[derive(Debug)]
pub struct CostResource {
    reduced_cost: Rc<RefCell<Vec<Vec<f64>>>>,
}

impl CostResource {
    pub fn new(reduced_cost: Rc<RefCell<Vec<Vec<f64>>>>) -> Self {
        CostResource { reduced_cost }
    }
}

impl Resource for CostResource {
    fn name(&self) -> &'static str {
        "cost"
    }

    fn initial(&self, _origin: NodeId) -> ResourceValue {
        ResourceValue::Scalar(0.0)
    }

    fn extend(&self, arc: &Arc, before: &ResourceValue) -> ResourceValue {
        let c_ij = self.reduced_cost.borrow()[arc.from.0][arc.to.0];
        ResourceValue::Scalar(before.as_scalar() + c_ij)
    }

    fn is_feasible(&self, _arc: &Arc, _before: &ResourceValue, _after: &ResourceValue) -> bool {
        true
    }

    fn debug_check_monotone(&self, arc: &Arc, lo: &ResourceValue, hi: &ResourceValue) -> Result<(), String> {
        scalar_extend_is_monotone(self, arc, lo, hi)
    }
}

/// Shared spot-check for the three scalar resources: `extend` is additive with a
/// non-negative (or, for `cost`, sign-agnostic but state-independent) increment, so
/// `lo <= hi` implies `extend(lo) <= extend(hi)` whenever both sides add the same
/// per-arc increment to their respective inputs.
fn scalar_extend_is_monotone(
    resource: &dyn Resource,
    arc: &Arc,
    lo: &ResourceValue,
    hi: &ResourceValue,
) -> Result<(), String> {
    let (lo, hi) = (lo.as_scalar(), hi.as_scalar());
    if lo > hi {
        return Err(format!(
            "{}: sample pair is not lo <= hi ({} > {})",
            resource.name(),
            lo,
            hi
        ));
    }
    let after_lo = resource.extend(arc, &ResourceValue::Scalar(lo)).as_scalar();
    let after_hi = resource.extend(arc, &ResourceValue::Scalar(hi)).as_scalar();
    if after_lo > after_hi {
        return Err(format!(
            "{}: extend({}) = {} > extend({}) = {}, monotonicity violated",
            resource.name(),
            lo,
            after_lo,
            hi,
            after_hi
        ));
    }
    Ok(())
}

/// `visited`: `V_j = V_i U {j}` for customer targets, a no-op for depots; feasible iff
/// `j` was not already in `V_i` (checked against the *pre*-extension state).
#[derive(Debug)]
pub struct VisitedResource {
    n: usize,
}

impl VisitedResource {
    pub fn new(n: usize) -> Self {
        VisitedResource { n }
    }
}

impl Resource for VisitedResource {
    fn name(&self) -> &'static str {
        "visited"
    }

    fn initial(&self, _origin: NodeId) -> ResourceValue {
        ResourceValue::Visited(FixedBitSet::with_capacity(self.n + 1))
    }

    fn extend(&self, arc: &Arc, before: &ResourceValue) -> ResourceValue {
        let mut bits = before.as_visited().clone();
        if arc.to.is_customer(self.n) {
            bits.insert(arc.to.0);
        }
        ResourceValue::Visited(bits)
    }

    fn is_feasible(&self, arc: &Arc, before: &ResourceValue, _after: &ResourceValue) -> bool {
        if arc.to.is_customer(self.n) {
            !before.as_visited().contains(arc.to.0)
        } else {
            true
        }
    }

    fn debug_check_monotone(&self, arc: &Arc, lo: &ResourceValue, hi: &ResourceValue) -> Result<(), String> {
        if lo.partial_compare(hi) != Some(std::cmp::Ordering::Less)
            && lo.partial_compare(hi) != Some(std::cmp::Ordering::Equal)
        {
            return Err("visited: sample pair is not lo <= hi".into());
        }
        let after_lo = self.extend(arc, lo);
        let after_hi = self.extend(arc, hi);
        match after_lo.partial_compare(&after_hi) {
            Some(std::cmp::Ordering::Less) | Some(std::cmp::Ordering::Equal) => Ok(()),
            _ => Err("visited: extend did not preserve the subset order".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc(from: usize, to: usize) -> Arc {
        Arc {
            from: NodeId(from),
            to: NodeId(to),
            cost: 0.0,
            travel_time: 0.0,
        }
    }

    #[test]
    fn time_resource_respects_ready_time_and_service() {
        let r = TimeResource::new(
            vec![0.0, 5.0],
            vec![100.0, 100.0],
            vec![2.0, 0.0],
            vec![vec![0.0, 3.0], vec![3.0, 0.0]],
        );
        let before = ResourceValue::Scalar(0.0);
        let after = r.extend(&arc(0, 1), &before);
        // t_i + s_i + tau = 0 + 2 + 3 = 5, matches ready[1] = 5.
        assert_eq!(after.as_scalar(), 5.0);
        assert!(r.is_feasible(&arc(0, 1), &before, &after));
    }

    #[test]
    fn time_resource_infeasible_past_due_date() {
        let r = TimeResource::new(vec![0.0, 0.0], vec![100.0, 2.0], vec![0.0, 0.0], vec![vec![0.0, 5.0], vec![5.0, 0.0]]);
        let before = ResourceValue::Scalar(0.0);
        let after = r.extend(&arc(0, 1), &before);
        assert!(!r.is_feasible(&arc(0, 1), &before, &after));
    }

    #[test]
    fn load_resource_accumulates_and_caps_at_capacity() {
        let r = LoadResource::new(vec![0.0, 4.0, 4.0], 6.0);
        let before = ResourceValue::Scalar(4.0);
        let after = r.extend(&arc(1, 2), &before);
        assert_eq!(after.as_scalar(), 8.0);
        assert!(!r.is_feasible(&arc(1, 2), &before, &after));
    }

    #[test]
    fn cost_resource_reads_the_shared_cell_and_updates_live() {
        let cell = Rc::new(RefCell::new(vec![vec![0.0, 2.0], vec![2.0, 0.0]]));
        let r = CostResource::new(cell.clone());
        let before = ResourceValue::Scalar(1.0);
        assert_eq!(r.extend(&arc(0, 1), &before).as_scalar(), 3.0);

        *cell.borrow_mut() = vec![vec![0.0, -5.0], vec![-5.0, 0.0]];
        assert_eq!(r.extend(&arc(0, 1), &before).as_scalar(), -4.0);
    }

    #[test]
    fn visited_resource_forbids_revisiting_a_customer() {
        let r = VisitedResource::new(4);
        let mut bits = FixedBitSet::with_capacity(5);
        bits.insert(2);
        let before = ResourceValue::Visited(bits);
        assert!(!r.is_feasible(&arc(1, 2), &before, &before.clone()));
    }

    #[test]
    fn visited_resource_is_a_no_op_at_the_destination_depot() {
        let r = VisitedResource::new(4);
        let before = ResourceValue::Visited(FixedBitSet::with_capacity(5));
        let after = r.extend(&arc(3, 5), &before);
        assert_eq!(after, before);
        assert!(r.is_feasible(&arc(3, 5), &before, &after));
    }
}
