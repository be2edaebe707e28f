//! Kind-based classification of a flat object list into the buckets the
//! editor toolbox and dialogs read from.

use enumset::EnumSet;
use serde::{Deserialize, Serialize};

use crate::properties::{NodeId, NodeKind, PipelineNode};

/// The object list of a pipeline, split by kind. Sources, sinks and stream
/// processors are stored as identifiers; topics keep their full records
/// because the canvas reads their settings directly, without another
/// lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub sources: Vec<NodeId>,
    pub sinks: Vec<NodeId>,
    pub streams: Vec<NodeId>,
    pub topics: Vec<PipelineNode>,
}

impl Catalog {
    pub fn classify(objects: &[PipelineNode]) -> Catalog {
        let mut catalog = Catalog::default();
        for object in objects {
            match object.kind() {
                NodeKind::Source => catalog.sources.push(object.id.clone()),
                NodeKind::Sink => catalog.sinks.push(object.id.clone()),
                NodeKind::Stream => catalog.streams.push(object.id.clone()),
                NodeKind::Topic => catalog.topics.push(object.clone()),
            }
        }
        catalog
    }

    /// Ids of every object whose kind is in `kinds`, in object-list order.
    pub fn kinds(objects: &[PipelineNode], kinds: EnumSet<NodeKind>) -> Vec<NodeId> {
        objects
            .iter()
            .filter(|object| kinds.contains(object.kind()))
            .map(|object| object.id.clone())
            .collect()
    }

    /// Ids subject to the single-upstream invariant (sinks and stream
    /// processors).
    pub fn single_upstream_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.sinks.iter().chain(self.streams.iter())
    }
}
