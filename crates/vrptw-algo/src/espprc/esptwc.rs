//! Concrete ESPPRC model (component E) binding Solomon-style VRPTW data to the four
//! resources of the data model: `time`, `load`, `cost`, `visited`. No behavior beyond
//! registration lives here; alternative variants (backhauls, pickup-and-delivery,
//! multi-depot) are added by swapping this component for one with a different resource
//! set, not by touching the labeling solver; the model itself never branches on which
//! resources are registered, it just iterates `self.resources` in order.

use std::cell::RefCell;
use std::rc::Rc;

use super::resources::{CostResource, LoadResource, TimeResource, VisitedResource};
use super::EsprcModel;
use vrptw_core::{Arc, Label, NodeId, PreprocessedGraph, Resource};

/// Registration order fixes these indices into every label's resource vector; the
/// labeling solver's `MinTime`/`MinCost`/`MinLoad` strategies read them back through
/// `EsptwcModel::{time,cost,load}_resource_index`.
const TIME: usize = 0;
const LOAD: usize = 1;
const COST: usize = 2;
const VISITED: usize = 3;

pub struct EsptwcModel {
    n: usize,
    resources: Vec<Box<dyn Resource>>,
    /// Shared with the `cost` resource so `set_arc_costs` can update it without going
    /// through the `Resource` trait (not every resource has external parameters to
    /// update between pricing rounds, so this isn't part of the trait's capability set).
    reduced_cost: Rc<RefCell<Vec<Vec<f64>>>>,
    successors: Vec<Vec<NodeId>>,
}

impl EsptwcModel {
    pub fn new(graph: &PreprocessedGraph) -> Self {
        let node_count = graph.node_count();
        let travel_time: Vec<Vec<f64>> = graph
            .travel_time
            .iter()
            .map(|row| row.iter().map(|t| t.unwrap_or(0.0)).collect())
            .collect();
        let initial_reduced_cost: Vec<Vec<f64>> = graph
            .cost
            .iter()
            .map(|row| row.iter().map(|c| c.unwrap_or(0.0)).collect())
            .collect();
        let successors: Vec<Vec<NodeId>> = (0..node_count)
            .map(|i| {
                (0..node_count)
                    .filter(|&j| graph.has_arc(i, j))
                    .map(NodeId)
                    .collect()
            })
            .collect();

        let reduced_cost = Rc::new(RefCell::new(initial_reduced_cost));

        // Registration order: time, load, cost, visited (matches TIME/LOAD/COST/VISITED).
        let resources: Vec<Box<dyn Resource>> = vec![
            Box::new(TimeResource::new(
                graph.ready.clone(),
                graph.due.clone(),
                graph.service.clone(),
                travel_time,
            )),
            Box::new(LoadResource::new(graph.demand.clone(), graph.capacity)),
            Box::new(CostResource::new(reduced_cost.clone())),
            Box::new(VisitedResource::new(graph.n)),
        ];

        EsptwcModel {
            n: graph.n,
            resources,
            reduced_cost,
            successors,
        }
    }

    fn destination(&self) -> NodeId {
        NodeId::destination(self.n)
    }
}

impl EsprcModel for EsptwcModel {
    fn initial_label(&self) -> Label {
        let resources = self
            .resources
            .iter()
            .map(|r| r.initial(NodeId::ORIGIN))
            .collect();
        Label {
            node: NodeId::ORIGIN,
            resources,
            predecessor: None,
        }
    }

    fn extend(&self, label: &Label, to: NodeId) -> Option<Label> {
        let arc = Arc {
            from: label.node,
            to,
            cost: 0.0,
            travel_time: 0.0,
        };

        let mut resources = Vec::with_capacity(self.resources.len());
        for (idx, resource) in self.resources.iter().enumerate() {
            let before = &label.resources[idx];
            let after = resource.extend(&arc, before);
            if !resource.is_feasible(&arc, before, &after) {
                return None;
            }
            resources.push(after);
        }

        Some(Label {
            node: to,
            resources,
            predecessor: None,
        })
    }

    fn is_terminal(&self, node: NodeId) -> bool {
        node == self.destination()
    }

    fn successors(&self, node: NodeId) -> &[NodeId] {
        &self.successors[node.0]
    }

    fn set_arc_costs(&mut self, reduced_cost: Vec<Vec<f64>>) {
        *self.reduced_cost.borrow_mut() = reduced_cost;
    }

    fn cost_resource_index(&self) -> usize {
        COST
    }

    fn time_resource_index(&self) -> usize {
        TIME
    }

    fn load_resource_index(&self) -> usize {
        LOAD
    }
}
