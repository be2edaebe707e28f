//! The client-side resolved view of a pipeline and the local edit
//! operations over it.
//!
//! A [PipelineGraph] is always a pure projection of `(objects, rules)`: it
//! carries no state the persisted [crate::properties::Rules] map does not
//! already encode, and can be re-derived from the pipeline record at any
//! time. Local edits go through [PipelineGraph::apply_update] for immediate
//! canvas feedback while [crate::reconcile::build_update_params]
//! independently computes the next rules map to persist.

use serde::{Deserialize, Serialize};

use crate::{
    catalog::Catalog,
    config::EditorDefaults,
    error::SluiceError,
    properties::{NodeId, NodeKind, NodeUpdate, Pipeline, PipelineNode, Rules},
    topology,
};

/// One resolved graph entry: the persisted object annotated with its
/// downstream list taken from the rules map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    #[serde(flatten)]
    pub node: PipelineNode,
    pub to: Vec<NodeId>,
}

impl GraphNode {
    pub fn id(&self) -> &NodeId {
        &self.node.id
    }

    pub fn kind(&self) -> NodeKind {
        self.node.kind()
    }
}

/// Scope of a single local edit applied by [PipelineGraph::apply_update].
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateScope {
    /// An edge is being attached or changed at a topic feeding
    /// `rewire_target` (a sink or stream processor). Any other topic still
    /// pointing at the target is severed from it.
    FromTopic { rewire_target: NodeId },
    /// Generic create-or-merge of any node, including attaching a topic or
    /// configuring a connector.
    Node,
}

/// The ordered, fully resolved node list used for rendering and local
/// editing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PipelineGraph(pub Vec<GraphNode>);

impl PipelineGraph {
    /// Resolve every rules key of `pipeline` against its object list.
    ///
    /// A rules key without a matching object is a [SluiceError::NotFound]:
    /// the persisted state is inconsistent and the editor must not mask it.
    /// A stream processor with an empty persisted name is given
    /// `defaults.stream_placeholder` as display name, at load time only —
    /// the placeholder never travels back into a rules update.
    pub fn load(pipeline: &Pipeline, defaults: &EditorDefaults) -> Result<Self, SluiceError> {
        for id in topology::single_upstream_violations(
            &pipeline.rules,
            &Catalog::classify(&pipeline.objects),
        ) {
            tracing::warn!("persisted rules list more than one upstream edge for '{id}'");
        }

        let entries = pipeline
            .rules
            .iter()
            .map(|(id, to)| {
                let object = pipeline.object(id).ok_or_else(|| {
                    SluiceError::NotFound(format!(
                        "rules key '{id}' has no matching object in pipeline '{}'",
                        pipeline.name
                    ))
                })?;

                let mut node = object.clone();
                if node.kind() == NodeKind::Stream && node.name.is_empty() {
                    node.name = defaults.stream_placeholder.clone();
                }

                Ok(GraphNode {
                    node,
                    to: to.clone(),
                })
            })
            .collect::<Result<Vec<GraphNode>, SluiceError>>()?;

        Ok(PipelineGraph(entries))
    }

    /// Project the graph back into a rules map. For a consistent pipeline,
    /// `PipelineGraph::load(p, d)?.to_rules() == p.rules`.
    pub fn to_rules(&self) -> Rules {
        self.0
            .iter()
            .map(|entry| (entry.node.id.clone(), entry.to.clone()))
            .collect::<Rules>()
    }

    pub fn get(&self, id: &NodeId) -> Option<&GraphNode> {
        self.0.iter().find(|entry| entry.id() == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&GraphNode> {
        self.0.iter().find(|entry| entry.node.name == name)
    }

    /// Downstream ids of `id` as rendered, empty when the node is absent.
    pub fn downstream(&self, id: &NodeId) -> &[NodeId] {
        self.get(id).map(|entry| entry.to.as_slice()).unwrap_or(&[])
    }

    /// Ids of every node whose `to` list still points at `id`. The
    /// confirmation dialog reads this before invoking [Self::remove].
    pub fn upstream_of(&self, id: &NodeId) -> Vec<NodeId> {
        self.0
            .iter()
            .filter(|entry| entry.to.contains(id))
            .map(|entry| entry.id().clone())
            .collect()
    }

    /// True when `id` has no remaining edges in either direction.
    pub fn is_isolated(&self, id: &NodeId) -> bool {
        self.downstream(id).is_empty() && self.upstream_of(id).is_empty()
    }

    /// Remove-by-id primitive. Edge guarding belongs to the caller: the
    /// confirmation dialog verifies via [Self::upstream_of] and
    /// [Self::downstream] before invoking this.
    pub fn remove(&self, id: &NodeId) -> PipelineGraph {
        PipelineGraph(
            self.0
                .iter()
                .filter(|entry| entry.id() != id)
                .cloned()
                .collect(),
        )
    }

    /// Rewrite the single entry identified by `id` through `transformer`,
    /// leaving every other entry untouched.
    pub fn map_node<F>(&self, id: &NodeId, transformer: F) -> PipelineGraph
    where
        F: Fn(&GraphNode) -> GraphNode,
    {
        PipelineGraph(
            self.0
                .iter()
                .map(|entry| {
                    if entry.id() == id {
                        transformer(entry)
                    } else {
                        entry.clone()
                    }
                })
                .collect(),
        )
    }

    /// Apply a single local edit, returning the next graph.
    ///
    /// With [UpdateScope::FromTopic], the edit attaches or changes an edge
    /// at a topic feeding a sink/stream: the target is optionally renamed,
    /// severed from every *other* topic still listing it (all occurrences,
    /// so a transiently inconsistent graph is repaired rather than left
    /// with a dangling extra edge), and the topic named by `update.id` gets
    /// `update.to` as its new downstream list.
    ///
    /// With [UpdateScope::Node], an unknown `update.id` appends a new node
    /// and a known one is shallow-merged in place.
    pub fn apply_update(
        &self,
        update: &NodeUpdate,
        scope: &UpdateScope,
    ) -> Result<PipelineGraph, SluiceError> {
        match scope {
            UpdateScope::FromTopic { rewire_target } => {
                self.apply_from_topic(update, rewire_target)
            }
            UpdateScope::Node => self.apply_node(update),
        }
    }

    fn apply_from_topic(
        &self,
        update: &NodeUpdate,
        rewire_target: &NodeId,
    ) -> Result<PipelineGraph, SluiceError> {
        let topic = self.get(&update.id).ok_or_else(|| {
            SluiceError::NotFound(format!("no topic '{}' in the graph", update.id))
        })?;
        if topic.kind() != NodeKind::Topic {
            return Err(SluiceError::Command(format!(
                "'{}' is a {}, only a topic can own a downstream edge",
                update.id,
                topic.kind()
            )));
        }
        let to = update.to.clone().ok_or_else(|| {
            SluiceError::Command(format!(
                "from-topic update for '{}' carries no downstream list",
                update.id
            ))
        })?;

        let mut next = self.clone();

        if let Some(name) = &update.name {
            next = next.map_node(rewire_target, |entry| {
                let mut entry = entry.clone();
                entry.node.name = name.clone();
                entry
            });
        }

        // Sever the target from every other topic before attaching the new
        // edge, keeping at most one upstream edge for it.
        for entry in next.0.iter_mut() {
            if entry.id() != &update.id
                && entry.kind() == NodeKind::Topic
                && entry.to.contains(rewire_target)
            {
                tracing::debug!(
                    "severing stale edge {} -> {rewire_target}",
                    entry.id()
                );
                entry.to.retain(|id| id != rewire_target);
            }
        }

        Ok(next.map_node(&update.id, |entry| {
            let mut entry = entry.clone();
            entry.to = to.clone();
            entry
        }))
    }

    fn apply_node(&self, update: &NodeUpdate) -> Result<PipelineGraph, SluiceError> {
        let mut next = self.clone();
        match next.0.iter_mut().find(|entry| entry.id() == &update.id) {
            None => {
                next.0.push(GraphNode {
                    node: update.clone().into_node()?,
                    to: update.to.clone().unwrap_or_default(),
                });
            }
            Some(entry) => {
                update.merge_into(&mut entry.node);
                if let Some(to) = &update.to {
                    entry.to = to.clone();
                }
            }
        }
        Ok(next)
    }
}
