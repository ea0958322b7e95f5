//! Embedded code fields.
//!
//! Node type families store their source code under different parameter
//! names. Only the fields in [`CODE_FIELDS`] are ever treated as code.

use flowsplit_config::Node;
use serde_json::Value;

use crate::error::LayoutError;

/// Candidate code fields, highest priority first.
pub const CODE_FIELDS: [&str; 4] = ["jsCode", "functionCode", "code", "javascriptCode"];

/// Code pulled out of a node's parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedCode {
  pub field: &'static str,
  pub content: String,
}

/// Return the first candidate field holding a non-empty string.
pub fn extract(node: &Node) -> Option<EmbeddedCode> {
  let params = node.parameters.as_ref()?;

  CODE_FIELDS.iter().find_map(|&field| match params.get(field) {
    Some(Value::String(content)) if !content.is_empty() => Some(EmbeddedCode {
      field,
      content: content.clone(),
    }),
    _ => None,
  })
}

/// Copy of `node` with `parameters[field]` set to `content`.
pub fn reinsert(node: &Node, field: &str, content: &str) -> Result<Node, LayoutError> {
  let mut updated = node.clone();
  let params = updated
    .parameters
    .as_mut()
    .ok_or_else(|| LayoutError::InvalidNode {
      name: node.name.clone(),
      reason: "node has no parameters".to_string(),
    })?;

  params.insert(field.to_string(), Value::String(content.to_string()));
  Ok(updated)
}

/// Field a sidecar is folded back into.
///
/// Same priority scan as [`extract`]; if the node's code has since been
/// emptied, the first candidate field that is still present is used.
pub fn sidecar_field(node: &Node) -> Option<&'static str> {
  if let Some(code) = extract(node) {
    return Some(code.field);
  }

  let params = node.parameters.as_ref()?;
  CODE_FIELDS
    .iter()
    .copied()
    .find(|field| params.contains_key(*field))
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn node_with(params: Value) -> Node {
    let mut node = Node::new("Code", "n8n-nodes-base.code");
    node.parameters = serde_json::from_value(params).unwrap();
    node
  }

  #[test]
  fn test_extract_prefers_priority_order() {
    let node = node_with(json!({ "code": "b()", "jsCode": "a()" }));
    let code = extract(&node).unwrap();
    assert_eq!(code.field, "jsCode");
    assert_eq!(code.content, "a()");
  }

  #[test]
  fn test_extract_skips_empty_values() {
    let node = node_with(json!({ "jsCode": "", "functionCode": "return items;" }));
    assert_eq!(extract(&node).unwrap().field, "functionCode");
  }

  #[test]
  fn test_extract_none_without_candidate() {
    let node = node_with(json!({ "url": "https://example.com", "script": "x" }));
    assert_eq!(extract(&node), None);
  }

  #[test]
  fn test_extract_ignores_non_string_values() {
    let node = node_with(json!({ "code": { "nested": true } }));
    assert_eq!(extract(&node), None);
  }

  #[test]
  fn test_extract_none_without_parameters() {
    let mut node = Node::new("Bare", "n8n-nodes-base.noOp");
    node.parameters = None;
    assert_eq!(extract(&node), None);
  }

  #[test]
  fn test_reinsert_leaves_input_untouched() {
    let node = node_with(json!({ "jsCode": "old()", "mode": "runOnceForAllItems" }));
    let updated = reinsert(&node, "jsCode", "new()").unwrap();

    assert_eq!(updated.parameter("jsCode"), Some(&json!("new()")));
    assert_eq!(updated.parameter("mode"), Some(&json!("runOnceForAllItems")));
    assert_eq!(node.parameter("jsCode"), Some(&json!("old()")));
  }

  #[test]
  fn test_reinsert_without_parameters_fails() {
    let mut node = Node::new("Bare", "n8n-nodes-base.code");
    node.parameters = None;

    let err = reinsert(&node, "jsCode", "x").unwrap_err();
    assert!(matches!(err, LayoutError::InvalidNode { .. }));
  }

  #[test]
  fn test_sidecar_field_falls_back_to_present_field() {
    let node = node_with(json!({ "functionCode": "" }));
    assert_eq!(sidecar_field(&node), Some("functionCode"));

    let node = node_with(json!({ "url": "x" }));
    assert_eq!(sidecar_field(&node), None);
  }
}
