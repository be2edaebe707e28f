//! WASM bindings for sluice-core
//!
//! JavaScript-accessible wrappers over the core operations, for the
//! browser-hosted canvas editor. Every function takes and returns plain
//! `JsValue`s holding the same JSON shapes the pipeline service speaks.
//!
//! ```javascript,ignore
//! import init, { load_graph, apply_update, build_update_params } from './sluice_core.js';
//!
//! async function main() {
//!     await init();
//!
//!     const pipeline = await (await fetch('/api/pipelines/demo')).json();
//!     const graph = load_graph(pipeline, null);
//!
//!     // Rewire sink s1 under topic t2, then persist the returned params.
//!     const params = build_update_params(pipeline, { id: 't2', to: ['s1'] }, 's1');
//!     await fetch('/api/pipelines/demo', { method: 'PUT', body: JSON.stringify(params) });
//! }
//! ```
//!
//! Values are converted through `serde_json::Value` before crossing the
//! boundary so map-shaped data (the rules table) lands in JavaScript as a
//! plain object rather than a `Map` — `Object.keys(rules)` and
//! `rules[id]` both work.

use wasm_bindgen::prelude::*;

use crate::{
    catalog::Catalog,
    config::EditorDefaults,
    error::SluiceError,
    event,
    graph::{PipelineGraph, UpdateScope},
    properties::{NodeId, NodeUpdate, Pipeline},
    status::{self, StatusPolicy},
};

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|err| to_js_err(SluiceError::from(err)))
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let json = serde_json::to_value(value).map_err(|err| to_js_err(SluiceError::from(err)))?;
    serde_wasm_bindgen::to_value(&json).map_err(|err| to_js_err(SluiceError::from(err)))
}

fn to_js_err(err: SluiceError) -> JsValue {
    JsError::new(&err.to_string()).into()
}

fn defaults_or_builtin(defaults: JsValue) -> Result<EditorDefaults, JsValue> {
    if defaults.is_null() || defaults.is_undefined() {
        Ok(EditorDefaults::default())
    } else {
        from_js(defaults)
    }
}

/// Derive the editable graph from a pipeline record. `defaults` may be
/// `null` to use the built-in presentation defaults.
#[wasm_bindgen]
pub fn load_graph(pipeline: JsValue, defaults: JsValue) -> Result<JsValue, JsValue> {
    let pipeline: Pipeline = from_js(pipeline)?;
    let defaults = defaults_or_builtin(defaults)?;
    let graph = PipelineGraph::load(&pipeline, &defaults).map_err(to_js_err)?;
    to_js(&graph)
}

/// Apply a single local edit to a graph snapshot. `rewire_target` must be
/// given when `from_topic` is true.
#[wasm_bindgen]
pub fn apply_update(
    graph: JsValue,
    update: JsValue,
    from_topic: bool,
    rewire_target: Option<String>,
) -> Result<JsValue, JsValue> {
    let graph: PipelineGraph = from_js(graph)?;
    let update: NodeUpdate = from_js(update)?;
    let scope = if from_topic {
        let target = rewire_target.ok_or_else(|| {
            to_js_err(SluiceError::Command(
                "from-topic update requires a rewire target".to_string(),
            ))
        })?;
        UpdateScope::FromTopic {
            rewire_target: NodeId::from(target),
        }
    } else {
        UpdateScope::Node
    };
    let next = graph.apply_update(&update, &scope).map_err(to_js_err)?;
    to_js(&next)
}

/// Compute the pipeline record to PUT for a local edit. `update` may be
/// `null` for a disconnect-only edit.
#[wasm_bindgen]
pub fn build_update_params(
    pipeline: JsValue,
    update: JsValue,
    rewire_target: Option<String>,
) -> Result<JsValue, JsValue> {
    let pipeline: Pipeline = from_js(pipeline)?;
    let update: Option<NodeUpdate> = if update.is_null() || update.is_undefined() {
        None
    } else {
        Some(from_js(update)?)
    };
    let target = rewire_target.map(NodeId::from);
    let params = crate::reconcile::build_update_params(&pipeline, update.as_ref(), target.as_ref());
    to_js(&params)
}

/// Split a pipeline's object list into kind buckets for the toolbox.
#[wasm_bindgen]
pub fn classify(objects: JsValue) -> Result<JsValue, JsValue> {
    let objects: Vec<crate::properties::PipelineNode> = from_js(objects)?;
    to_js(&Catalog::classify(&objects))
}

/// Coarse Running/Stopped label plus counts. `policy` may be `null`.
#[wasm_bindgen]
pub fn derive_status(pipeline: JsValue, policy: JsValue) -> Result<JsValue, JsValue> {
    let pipeline: Pipeline = from_js(pipeline)?;
    let policy: StatusPolicy = if policy.is_null() || policy.is_undefined() {
        StatusPolicy::default()
    } else {
        from_js(policy)?
    };
    to_js(&status::status_report(&pipeline, &policy))
}

/// Event stream turning the `old` snapshot into `new`, for incremental
/// canvas redraws.
#[wasm_bindgen]
pub fn graph_diff(old: JsValue, new: JsValue) -> Result<JsValue, JsValue> {
    let old: PipelineGraph = from_js(old)?;
    let new: PipelineGraph = from_js(new)?;
    to_js(&event::diff(&old, &new))
}
