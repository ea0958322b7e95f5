use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Connections keyed by source node name.
pub type ConnectionGraph = BTreeMap<String, OutputPorts>;

/// Output port name (e.g. "main") to one slot per output index, each slot
/// holding the ordered targets wired to it.
pub type OutputPorts = BTreeMap<String, Vec<Vec<ConnectionTarget>>>;

/// One end of a connection edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionTarget {
  /// Name of the target node.
  pub node: String,
  /// Port type and input index as stored, e.g. `"type": "main", "index": 0`.
  #[serde(flatten)]
  pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ConnectionTarget {
  pub fn new(node: impl Into<String>) -> Self {
    Self {
      node: node.into(),
      extra: serde_json::Map::new(),
    }
  }
}
