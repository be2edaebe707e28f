//! Read-only petgraph projections of the persisted rules map: reachability
//! walks for canvas highlighting and audits over the whole-map invariants.
//! Nothing here mutates; repairs belong to [crate::reconcile].

use petgraph::{
    graphmap::GraphMap,
    visit::{depth_first_search, DfsEvent},
    Directed,
};
use std::collections::BTreeSet;

use crate::{
    catalog::Catalog,
    properties::{NodeId, Pipeline, Rules},
};

type RouteGraph<'a> = GraphMap<&'a NodeId, (), Directed>;

fn route_graph(rules: &Rules, reverse: bool) -> RouteGraph<'_> {
    let mut graph = RouteGraph::new();
    for (from, to) in rules.iter() {
        graph.add_node(from);
        for target in to {
            if reverse {
                graph.add_edge(target, from, ());
            } else {
                graph.add_edge(from, target, ());
            }
        }
    }
    graph
}

fn closure(graph: &RouteGraph<'_>, start: &NodeId) -> BTreeSet<NodeId> {
    let mut reached = BTreeSet::new();
    if graph.contains_node(start) {
        depth_first_search(graph, Some(start), |event| {
            if let DfsEvent::Discover(id, _) = event {
                reached.insert(id.clone());
            }
        });
    }
    reached
}

/// Every node reachable by following downstream edges from `start`,
/// including `start` itself when it participates in the graph.
pub fn downstream_closure(rules: &Rules, start: &NodeId) -> BTreeSet<NodeId> {
    closure(&route_graph(rules, false), start)
}

/// Every node that can reach `start` by following downstream edges.
pub fn upstream_closure(rules: &Rules, start: &NodeId) -> BTreeSet<NodeId> {
    closure(&route_graph(rules, true), start)
}

/// Sinks and stream processors listed as a downstream target by more than
/// one entry. Non-empty output means the persisted state violates the
/// single-upstream invariant and needs reconciliation.
pub fn single_upstream_violations(rules: &Rules, catalog: &Catalog) -> Vec<NodeId> {
    catalog
        .single_upstream_ids()
        .filter(|id| rules.fan_in(id) > 1)
        .cloned()
        .collect()
}

/// Rules keys with no matching object record. The loader refuses such a
/// pipeline; this audit names every offender for diagnostics.
pub fn dangling_keys(pipeline: &Pipeline) -> Vec<NodeId> {
    pipeline
        .rules
        .keys()
        .filter(|id| !pipeline.contains(id))
        .cloned()
        .collect()
}
