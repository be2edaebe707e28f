//! Shared fixtures for the unit test modules.

use crate::graph::GraphNode;
use crate::properties::{
    ConnectorSettings, NodeId, NodeKind, NodeSettings, PipelineNode, StreamSettings, TopicSettings,
};

/// A pipeline object of the given kind with default settings.
pub fn connector(id: &str, name: &str, kind: NodeKind) -> PipelineNode {
    let settings = match kind {
        NodeKind::Source => NodeSettings::Source(ConnectorSettings::default()),
        NodeKind::Sink => NodeSettings::Sink(ConnectorSettings::default()),
        NodeKind::Topic => NodeSettings::Topic(TopicSettings::default()),
        NodeKind::Stream => NodeSettings::Stream(StreamSettings::default()),
    };
    PipelineNode::new(id, name, settings)
}

/// A resolved topic graph entry pointing at `to`.
pub fn topic(id: &str, name: &str, to: Vec<&str>) -> GraphNode {
    GraphNode {
        node: connector(id, name, NodeKind::Topic),
        to: to.into_iter().map(NodeId::from).collect(),
    }
}
