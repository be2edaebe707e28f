//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use sluice_core::properties::{
    ConnectorSettings, NodeKind, NodeSettings, NodeState, Pipeline, PipelineNode, StreamSettings,
    TopicSettings,
};

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times — subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// A pipeline object of the given kind with default settings.
pub fn node(id: &str, name: &str, kind: NodeKind) -> PipelineNode {
    let settings = match kind {
        NodeKind::Source => NodeSettings::Source(ConnectorSettings::default()),
        NodeKind::Sink => NodeSettings::Sink(ConnectorSettings::default()),
        NodeKind::Topic => NodeSettings::Topic(TopicSettings::default()),
        NodeKind::Stream => NodeSettings::Stream(StreamSettings::default()),
    };
    PipelineNode::new(id, name, settings)
}

/// Same as [node], with an explicit runtime state.
#[allow(dead_code)]
pub fn node_in_state(id: &str, name: &str, kind: NodeKind, state: NodeState) -> PipelineNode {
    let mut node = node(id, name, kind);
    node.state = state;
    node
}

/// A small but complete pipeline:
///
/// ```text
/// ftp source -> events topic -> word split stream -> counted topic -> hdfs sink
/// ```
///
/// Every rules key has a matching object, so loading always succeeds.
#[allow(dead_code)]
pub fn wordcount_pipeline() -> Pipeline {
    Pipeline {
        name: "wordcount".to_string(),
        objects: vec![
            node("src1", "ftp source", NodeKind::Source),
            node("t1", "events", NodeKind::Topic),
            node("w1", "word split", NodeKind::Stream),
            node("t2", "counted", NodeKind::Topic),
            node("s1", "hdfs sink", NodeKind::Sink),
        ],
        rules: [
            ("src1", vec!["t1"]),
            ("t1", vec!["w1"]),
            ("w1", vec!["t2"]),
            ("t2", vec!["s1"]),
        ]
        .into_iter()
        .collect(),
    }
}
