use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Canvas coordinates `[x, y]`.
///
/// Kept as JSON numbers so integer positions are written back as integers.
pub type Position = [Number; 2];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
  /// Stable node identifier assigned by the editor. Optional for older documents.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  /// Display name. Connections reference nodes by this value.
  #[serde(default)]
  pub name: String,
  /// Dotted type identifier, e.g. "n8n-nodes-base.httpRequest".
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub node_type: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub type_version: Option<Number>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub position: Option<Position>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub parameters: Option<Map<String, Value>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub credentials: Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub webhook_id: Option<String>,
  /// Any other node fields (`disabled`, `notes`, ...).
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Node {
  /// Create a node with a name and type and an empty parameter set.
  pub fn new(name: impl Into<String>, node_type: impl Into<String>) -> Self {
    Self {
      id: None,
      name: name.into(),
      node_type: Some(node_type.into()),
      type_version: Some(Number::from(1)),
      position: Some([Number::from(0), Number::from(0)]),
      parameters: Some(Map::new()),
      credentials: None,
      webhook_id: None,
      extra: Map::new(),
    }
  }

  /// Look up a single parameter value.
  pub fn parameter(&self, field: &str) -> Option<&Value> {
    self.parameters.as_ref().and_then(|p| p.get(field))
  }
}
