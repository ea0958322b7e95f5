use chrono::{DateTime, Utc};
use flowsplit_config::{ConnectionGraph, Node, Position, WorkflowDocument};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A workflow as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSummary {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub active: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// One page of the list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListPage {
  pub data: Vec<WorkflowSummary>,
  #[serde(default)]
  pub next_cursor: Option<String>,
}

/// Body of a create or update request.
///
/// The API rejects read-only fields (`id`, `active`, `tags`, timestamps), so
/// everything else is dropped here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePayload {
  pub name: String,
  pub nodes: Vec<NodePayload>,
  pub connections: ConnectionGraph,
  pub settings: Value,
}

/// A node reduced to the fields accepted on write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePayload {
  pub parameters: Map<String, Value>,
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub node_type: Option<String>,
  pub type_version: Number,
  pub position: Position,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub webhook_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub credentials: Option<Value>,
}

impl From<&Node> for NodePayload {
  fn from(node: &Node) -> Self {
    Self {
      parameters: node.parameters.clone().unwrap_or_default(),
      node_type: node.node_type.clone(),
      type_version: node.type_version.clone().unwrap_or_else(|| Number::from(1)),
      position: node
        .position
        .clone()
        .unwrap_or_else(|| [Number::from(0), Number::from(0)]),
      id: node.id.clone(),
      name: node.name.clone(),
      webhook_id: node.webhook_id.clone().filter(|id| !id.is_empty()),
      credentials: node.credentials.clone().filter(|c| !is_empty_value(c)),
    }
  }
}

impl From<&WorkflowDocument> for UpdatePayload {
  fn from(doc: &WorkflowDocument) -> Self {
    let name = if doc.name.is_empty() {
      "Untitled Workflow".to_string()
    } else {
      doc.name.clone()
    };

    Self {
      name,
      nodes: doc.nodes.iter().map(NodePayload::from).collect(),
      connections: doc.connections.clone(),
      settings: doc
        .settings
        .clone()
        .filter(|s| !s.is_null())
        .unwrap_or_else(|| Value::Object(Map::new())),
    }
  }
}

fn is_empty_value(value: &Value) -> bool {
  match value {
    Value::Null => true,
    Value::Bool(b) => !b,
    Value::String(s) => s.is_empty(),
    _ => false,
  }
}
