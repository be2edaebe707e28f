//! [crate::properties] contains the basic building blocks of the pipeline
//! data model: node identifiers, the closed kind/state sets, the kind-tagged
//! settings payloads, the persisted [Rules] adjacency map, and the
//! server-held [Pipeline] record that the rest of the crate projects and
//! reconciles.

use enumset::EnumSetType;
pub use enumset::EnumSet;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
    ops::{Deref, DerefMut},
};
use uuid::Uuid;

use crate::error::SluiceError;

/// Opaque identifier of a pipeline object. Canonical ids are assigned by the
/// external pipeline service; [NodeId::random] produces a placeholder id for
/// optimistic node creation before the service has confirmed the record.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn random() -> Self {
        NodeId(
            Uuid::new_v4()
                .as_simple()
                .encode_lower(&mut Uuid::encode_buffer())
                .to_string(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        NodeId(id)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// [NodeKind] enumerates all pipeline object types the editor understands.
/// The set is closed: a record whose kind falls outside it fails
/// deserialization instead of being silently dropped.
#[derive(Debug, Serialize, Deserialize, PartialOrd, Ord, Hash, EnumSetType)]
#[enumset(repr = "u8")]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Source,
    Sink,
    Topic,
    Stream,
}

impl NodeKind {
    /// A topic may feed any number of downstream nodes and be fed by any
    /// number of sources.
    pub fn fans_out(self) -> bool {
        self == NodeKind::Topic
    }

    /// Sinks and stream processors accept at most one upstream edge across
    /// the whole rules map.
    pub fn single_upstream(self) -> bool {
        matches!(self, NodeKind::Sink | NodeKind::Stream)
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Source => write!(f, "source"),
            NodeKind::Sink => write!(f, "sink"),
            NodeKind::Topic => write!(f, "topic"),
            NodeKind::Stream => write!(f, "stream"),
        }
    }
}

/// Runtime state of a pipeline object. Transitions are owned and driven by
/// the external connector/topic service; this crate only ever reads the
/// current snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeState {
    #[default]
    Created,
    Running,
    Stopped,
    Failed,
}

impl NodeState {
    pub fn is_running(self) -> bool {
        self == NodeState::Running
    }
}

impl Display for NodeState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeState::Created => write!(f, "CREATED"),
            NodeState::Running => write!(f, "RUNNING"),
            NodeState::Stopped => write!(f, "STOPPED"),
            NodeState::Failed => write!(f, "FAILED"),
        }
    }
}

/// Settings shared by source and sink connectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectorSettings {
    /// Fully qualified class of the connector plugin, once the participant
    /// has picked one in the configuration form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Free-form key/value configuration forwarded to the connector.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub configs: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSettings {
    #[serde(default = "default_partitions")]
    pub partitions: i32,
    #[serde(default = "default_replications")]
    pub replications: i16,
}

fn default_partitions() -> i32 {
    1
}
fn default_replications() -> i16 {
    1
}

impl Default for TopicSettings {
    fn default() -> Self {
        TopicSettings {
            partitions: default_partitions(),
            replications: default_replications(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamSettings {
    /// Name of the uploaded jar backing the stream app, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jar_name: Option<String>,
    #[serde(default = "default_instances")]
    pub instances: u32,
}

fn default_instances() -> u32 {
    1
}

/// Kind-specific payload of a pipeline object, tagged by `kind` on the wire.
/// Making the union closed is what turns the original "unknown kind is
/// silently dropped" gap into a deserialization error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeSettings {
    Source(ConnectorSettings),
    Sink(ConnectorSettings),
    Topic(TopicSettings),
    Stream(StreamSettings),
}

impl NodeSettings {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeSettings::Source(_) => NodeKind::Source,
            NodeSettings::Sink(_) => NodeKind::Sink,
            NodeSettings::Topic(_) => NodeKind::Topic,
            NodeSettings::Stream(_) => NodeKind::Stream,
        }
    }
}

/// A single persisted pipeline object as returned by the external pipeline
/// service. The downstream adjacency of a node lives in [Rules], not here
/// (see [crate::graph::GraphNode] for the resolved view).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineNode {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: NodeState,
    #[serde(flatten)]
    pub settings: NodeSettings,
}

impl PipelineNode {
    pub fn new<I: Into<NodeId>>(id: I, name: &str, settings: NodeSettings) -> Self {
        PipelineNode {
            id: id.into(),
            name: name.to_string(),
            state: NodeState::default(),
            settings,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.settings.kind()
    }
}

/// A partial edit of a single node, produced by the editor forms and applied
/// by [crate::graph::PipelineGraph::apply_update] and
/// [crate::reconcile::build_update_params]. Absent fields leave the target
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeUpdate {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<NodeState>,
    /// Replacement downstream list for the node, when the edit rewires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Vec<NodeId>>,
    /// Full kind-tagged settings payload. Required when the update creates
    /// a node; a bare `{ id, to }` rewire carries none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<NodeSettings>,
}

impl NodeUpdate {
    pub fn new<I: Into<NodeId>>(id: I) -> Self {
        NodeUpdate {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_to<I: Into<NodeId>>(mut self, to: Vec<I>) -> Self {
        self.to = Some(to.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_settings(mut self, settings: NodeSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Materialize a new node from this update (the creation path). The
    /// tagged settings payload is what fixes the node's kind, so creation
    /// without one is a malformed command.
    pub fn into_node(self) -> Result<PipelineNode, SluiceError> {
        let settings = self.settings.ok_or_else(|| {
            SluiceError::Command(format!(
                "cannot create node '{}' without a kind-tagged settings payload",
                self.id
            ))
        })?;
        Ok(PipelineNode {
            id: self.id,
            name: self.name.unwrap_or_default(),
            state: self.state.unwrap_or_default(),
            settings,
        })
    }

    /// Shallow-merge the present fields into an existing node. The `to`
    /// list is graph-level data and is merged by the caller.
    pub fn merge_into(&self, node: &mut PipelineNode) {
        if let Some(name) = &self.name {
            node.name = name.clone();
        }
        if let Some(state) = self.state {
            node.state = state;
        }
        if let Some(settings) = &self.settings {
            node.settings = settings.clone();
        }
    }
}

/// The canonical, persisted adjacency representation: node id to the ids of
/// its downstream nodes. A node id absent from the map has an implicitly
/// empty downstream list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rules(pub BTreeMap<NodeId, Vec<NodeId>>);

impl Rules {
    /// Downstream ids of `id`, empty when the id carries no entry.
    pub fn downstream(&self, id: &NodeId) -> &[NodeId] {
        self.0.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of entries across the whole map that list `id` as a
    /// downstream target. Anything above 1 violates the single-upstream
    /// invariant for sinks and stream processors.
    pub fn fan_in(&self, id: &NodeId) -> usize {
        self.0.values().filter(|to| to.contains(id)).count()
    }

    pub fn route<I: Into<NodeId>>(&mut self, from: I, to: Vec<I>) {
        self.0
            .insert(from.into(), to.into_iter().map(Into::into).collect());
    }
}

impl Deref for Rules {
    type Target = BTreeMap<NodeId, Vec<NodeId>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Rules {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<F: Into<NodeId>, T: Into<NodeId>> FromIterator<(F, Vec<T>)> for Rules {
    fn from_iter<I: IntoIterator<Item = (F, Vec<T>)>>(iter: I) -> Self {
        Rules(
            iter.into_iter()
                .map(|(from, to)| (from.into(), to.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }
}

/// The server-held source of truth for one pipeline: the flat object list
/// plus the [Rules] adjacency map. Everything else in this crate is a pure
/// function of this record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(default)]
    pub name: String,
    pub objects: Vec<PipelineNode>,
    pub rules: Rules,
}

impl Pipeline {
    pub fn object(&self, id: &NodeId) -> Option<&PipelineNode> {
        self.objects.iter().find(|object| &object.id == id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.object(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_node_wire_format() {
        let json = r#"{
            "id": "t1",
            "name": "events",
            "state": "RUNNING",
            "kind": "topic",
            "partitions": 3,
            "replications": 1
        }"#;
        let node: PipelineNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.kind(), NodeKind::Topic);
        assert!(node.state.is_running());
        match &node.settings {
            NodeSettings::Topic(topic) => assert_eq!(topic.partitions, 3),
            other => panic!("expected topic settings, got {other:?}"),
        }

        let round_trip: PipelineNode =
            serde_json::from_str(&serde_json::to_string(&node).unwrap()).unwrap();
        assert_eq!(round_trip, node);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let json = r#"{"id": "x", "kind": "widget"}"#;
        let result = serde_json::from_str::<PipelineNode>(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_rules_implicit_empty_and_fan_in() {
        let rules: Rules = [("t1", vec!["s1", "s2"]), ("t2", vec!["s1"])]
            .into_iter()
            .collect();

        assert_eq!(rules.downstream(&"t1".into()).len(), 2);
        assert!(rules.downstream(&"unlisted".into()).is_empty());
        assert_eq!(rules.fan_in(&"s1".into()), 2);
        assert_eq!(rules.fan_in(&"s2".into()), 1);
        assert_eq!(rules.fan_in(&"t1".into()), 0);
    }

    #[test]
    fn test_rules_wire_format_is_a_plain_map() {
        let rules: Rules = [("t1", vec!["s1"])].into_iter().collect();
        let json = serde_json::to_string(&rules).unwrap();
        assert_eq!(json, r#"{"t1":["s1"]}"#);
    }

    #[test]
    fn test_update_without_settings_cannot_create() {
        let update = NodeUpdate::new("c1").with_name("orphan");
        assert!(update.into_node().is_err());
    }

    #[test]
    fn test_update_merge_leaves_absent_fields_untouched() {
        let mut node = PipelineNode::new(
            "s1",
            "raw sink",
            NodeSettings::Sink(ConnectorSettings::default()),
        );
        node.state = NodeState::Stopped;

        NodeUpdate::new("s1").with_name("renamed").merge_into(&mut node);

        assert_eq!(node.name, "renamed");
        assert_eq!(node.state, NodeState::Stopped);
        assert_eq!(node.kind(), NodeKind::Sink);
    }

    #[test]
    fn test_random_ids_are_distinct() {
        assert_ne!(NodeId::random(), NodeId::random());
    }
}
