use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use crate::graph::PipelineGraph;
use crate::properties::NodeId;

/// A single observable difference between two graph snapshots. The canvas
/// layer consumes these to redraw incrementally instead of re-rendering the
/// whole pipeline after every edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphEvent {
    NodeAdded(NodeId),
    NodeRemoved(NodeId),
    /// Node id, new display name
    NodeRenamed(NodeId, String),
    /// State or settings changed without a rename
    NodeUpdated(NodeId),
    /// Upstream id, downstream id
    EdgeSet(NodeId, NodeId),
    EdgeSevered(NodeId, NodeId),
}

impl Display for GraphEvent {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            GraphEvent::NodeAdded(_) => write!(f, "NodeAdded"),
            GraphEvent::NodeRemoved(_) => write!(f, "NodeRemoved"),
            GraphEvent::NodeRenamed(_, _) => write!(f, "NodeRenamed"),
            GraphEvent::NodeUpdated(_) => write!(f, "NodeUpdated"),
            GraphEvent::EdgeSet(_, _) => write!(f, "EdgeSet"),
            GraphEvent::EdgeSevered(_, _) => write!(f, "EdgeSevered"),
        }
    }
}

/// Compute the event stream that transforms `old` into `new`.
///
/// Removals are emitted first so the canvas can drop stale shapes before
/// drawing new ones over them.
pub fn diff(old: &PipelineGraph, new: &PipelineGraph) -> Vec<GraphEvent> {
    let mut events = Vec::new();

    for entry in old.0.iter() {
        if new.get(entry.id()).is_none() {
            for target in &entry.to {
                events.push(GraphEvent::EdgeSevered(entry.id().clone(), target.clone()));
            }
            events.push(GraphEvent::NodeRemoved(entry.id().clone()));
        }
    }

    for entry in new.0.iter() {
        match old.get(entry.id()) {
            None => {
                events.push(GraphEvent::NodeAdded(entry.id().clone()));
                for target in &entry.to {
                    events.push(GraphEvent::EdgeSet(entry.id().clone(), target.clone()));
                }
            }
            Some(previous) => {
                if previous.node.name != entry.node.name {
                    events.push(GraphEvent::NodeRenamed(
                        entry.id().clone(),
                        entry.node.name.clone(),
                    ));
                }
                if previous.node.state != entry.node.state
                    || previous.node.settings != entry.node.settings
                {
                    events.push(GraphEvent::NodeUpdated(entry.id().clone()));
                }

                let before: BTreeSet<&NodeId> = previous.to.iter().collect();
                let after: BTreeSet<&NodeId> = entry.to.iter().collect();
                for severed in before.difference(&after) {
                    events.push(GraphEvent::EdgeSevered(
                        entry.id().clone(),
                        (*severed).clone(),
                    ));
                }
                for set in after.difference(&before) {
                    events.push(GraphEvent::EdgeSet(entry.id().clone(), (*set).clone()));
                }
            }
        }
    }

    events
}
