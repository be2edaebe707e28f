//! # sluice-core
//!
//! Topology consistency engine for a visual data-pipeline editor.
//!
//! A pipeline is a set of sources, sinks, stream processors and topics that
//! participants wire together on a canvas. The server holds the source of
//! truth as a flat object list plus a `rules` adjacency map; this crate is
//! the pure data-model layer between the (excluded) canvas UI and the
//! (excluded) REST client. It classifies pipeline objects, derives the
//! editable graph from persisted state, and reconciles graph rewrites so
//! that one invariant never breaks: **a non-fan-out node (sink or stream
//! processor) has at most one upstream edge at any time**.
//!
//! ## Architecture
//!
//! - **[`properties`]**: node identifiers, the closed kind/state sets, the
//!   kind-tagged settings union, `Rules`, `Pipeline`
//! - **[`catalog`]**: kind-based classification of the object list
//! - **[`graph`]**: the resolved `PipelineGraph` view, loading and local
//!   edits (`apply_update`)
//! - **[`reconcile`]**: the next persisted rules map for a proposed rewire
//!   (`reconcile_local`, `build_update_params`)
//! - **[`status`]**: coarse running/stopped label for the whole pipeline
//! - **[`topology`]**: read-only reachability walks and invariant audits
//! - **[`event`]**: snapshot diffs for incremental canvas redraws
//! - **[`config`]**: presentation defaults, passed into the core explicitly
//!
//! Every operation is a synchronous pure function over immutable inputs.
//! The caller serializes edits per pipeline and supplies the latest
//! confirmed server state on each invocation; the core performs no I/O, no
//! locking and no versioning. If a caller discards an in-flight edit, it
//! simply never hands it to the core.
//!
//! ## Invariants
//!
//! 1. At most one entry across the whole rules map lists a given sink or
//!    stream processor as a downstream target.
//! 2. A topic may fan out to any number of downstream nodes and be fed by
//!    any number of sources.
//! 3. The graph is always re-derivable as a pure function of
//!    `(objects, rules)`; it carries no state the rules map does not
//!    already encode.
//! 4. A node id absent from the rules map has an implicitly empty
//!    downstream list.
//!
//! ## Quick Start
//!
//! ```rust
//! use sluice_core::{
//!     config::EditorDefaults,
//!     graph::PipelineGraph,
//!     properties::{
//!         ConnectorSettings, NodeId, NodeSettings, NodeUpdate, Pipeline, PipelineNode,
//!         TopicSettings,
//!     },
//!     reconcile::build_update_params,
//! };
//!
//! # fn main() -> Result<(), sluice_core::SluiceError> {
//! let pipeline = Pipeline {
//!     name: "demo".to_string(),
//!     objects: vec![
//!         PipelineNode::new("t1", "events", NodeSettings::Topic(TopicSettings::default())),
//!         PipelineNode::new(
//!             "s1",
//!             "warehouse",
//!             NodeSettings::Sink(ConnectorSettings::default()),
//!         ),
//!     ],
//!     rules: [("t1", vec!["s1"])].into_iter().collect(),
//! };
//!
//! // Derive the render view. It is a pure projection of the pipeline.
//! let graph = PipelineGraph::load(&pipeline, &EditorDefaults::default())?;
//! assert_eq!(graph.to_rules(), pipeline.rules);
//!
//! // Rewire s1 under a new topic: the stale t1 -> s1 edge is severed
//! // before the new edge is merged, so s1 keeps a single upstream.
//! let update = NodeUpdate::new("t2").with_to(vec!["s1"]);
//! let next = build_update_params(&pipeline, Some(&update), Some(&NodeId::from("s1")));
//! assert_eq!(next.rules.fan_in(&NodeId::from("s1")), 1);
//! assert!(next.rules.downstream(&NodeId::from("t1")).is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **default**: the pure core
//! - **wasm**: `wasm-bindgen` bindings for the browser editor build (see
//!   [`wasm`])

pub mod catalog;
pub mod config;
pub mod error;
pub mod event;
pub mod graph;
pub mod properties;
pub mod reconcile;
pub mod status;
#[cfg(test)]
mod tests;
pub mod topology;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::*;
