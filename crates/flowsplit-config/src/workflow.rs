use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::connection::ConnectionGraph;
use crate::node::Node;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDocument {
  /// Assigned by the remote store; absent until the document is persisted.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub active: bool,
  pub nodes: Vec<Node>,
  #[serde(default)]
  pub connections: ConnectionGraph,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub settings: Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub static_data: Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub tags: Option<Vec<Value>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version_id: Option<String>,
  /// Top-level fields not modelled above (`createdAt`, `pinData`, `meta`, ...).
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl WorkflowDocument {
  /// Create an unsaved document with no nodes.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      id: None,
      name: name.into(),
      active: false,
      nodes: Vec::new(),
      connections: ConnectionGraph::new(),
      settings: None,
      static_data: None,
      tags: None,
      version_id: None,
      extra: Map::new(),
    }
  }

  /// Get a node by its display name.
  pub fn node_by_name(&self, name: &str) -> Option<&Node> {
    self.nodes.iter().find(|n| n.name == name)
  }

  /// Iterate over every `(source, target)` node-name pair in the connection graph.
  pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
    self.connections.iter().flat_map(|(source, ports)| {
      ports
        .values()
        .flatten()
        .flatten()
        .map(move |target| (source.as_str(), target.node.as_str()))
    })
  }
}
