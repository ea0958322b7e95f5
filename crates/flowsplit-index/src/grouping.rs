use std::collections::BTreeMap;

use flowsplit_config::{Node, WorkflowDocument};
use serde::{Deserialize, Serialize};

/// Lightweight description of one node for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSummary {
  /// `node-{index}`
  pub identifier: String,
  pub name: String,
  pub node_type: String,
  pub category: String,
  pub node_index: usize,
}

/// Nodes grouped by category. Categories iterate in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingIndex {
  groups: BTreeMap<String, Vec<NodeSummary>>,
}

/// Category for a node type: the part after the last `.`.
///
/// A missing or empty type counts as "Unknown"; a type ending in `.` as "Other".
pub fn category_of(node_type: Option<&str>) -> String {
  let node_type = node_type.filter(|t| !t.is_empty()).unwrap_or("Unknown");
  match node_type.rsplit('.').next() {
    Some(category) if !category.is_empty() => category.to_string(),
    _ => "Other".to_string(),
  }
}

impl GroupingIndex {
  /// Build the index for every node of `doc`, in document order.
  pub fn rebuild(doc: &WorkflowDocument) -> Self {
    let mut groups: BTreeMap<String, Vec<NodeSummary>> = BTreeMap::new();

    for (index, node) in doc.nodes.iter().enumerate() {
      let summary = summarize(index, node);
      groups
        .entry(summary.category.clone())
        .or_default()
        .push(summary);
    }

    Self { groups }
  }

  /// Category names in lexicographic order.
  pub fn categories(&self) -> impl Iterator<Item = &str> {
    self.groups.keys().map(String::as_str)
  }

  /// Nodes of one category, in document order.
  pub fn nodes_in(&self, category: &str) -> &[NodeSummary] {
    self
      .groups
      .get(category)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Iterate `(category, nodes)` pairs.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &[NodeSummary])> {
    self
      .groups
      .iter()
      .map(|(category, nodes)| (category.as_str(), nodes.as_slice()))
  }

  pub fn category_count(&self) -> usize {
    self.groups.len()
  }

  pub fn node_count(&self) -> usize {
    self.groups.values().map(Vec::len).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.groups.is_empty()
  }
}

fn summarize(index: usize, node: &Node) -> NodeSummary {
  let node_type = node
    .node_type
    .as_deref()
    .filter(|t| !t.is_empty())
    .unwrap_or("Unknown")
    .to_string();
  let name = if node.name.is_empty() {
    format!("Node {index}")
  } else {
    node.name.clone()
  };

  NodeSummary {
    identifier: format!("node-{index}"),
    name,
    category: category_of(Some(&node_type)),
    node_type,
    node_index: index,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn doc_with(types: &[(&str, Option<&str>)]) -> WorkflowDocument {
    let mut doc = WorkflowDocument::new("test");
    for (name, node_type) in types {
      let mut node = Node::new(*name, "placeholder");
      node.node_type = node_type.map(str::to_string);
      doc.nodes.push(node);
    }
    doc
  }

  #[test]
  fn test_two_categories_in_order() {
    let doc = doc_with(&[
      ("Set", Some("n8n-nodes-base.set")),
      ("Fetch", Some("n8n-nodes-base.httpRequest")),
    ]);

    let index = GroupingIndex::rebuild(&doc);
    assert_eq!(index.categories().collect::<Vec<_>>(), vec!["httpRequest", "set"]);
    assert_eq!(index.nodes_in("httpRequest").len(), 1);
    assert_eq!(index.nodes_in("set").len(), 1);
    assert_eq!(index.nodes_in("httpRequest")[0].node_index, 1);
  }

  #[test]
  fn test_within_category_keeps_document_order() {
    let doc = doc_with(&[
      ("B", Some("n8n-nodes-base.set")),
      ("Other", Some("n8n-nodes-base.if")),
      ("A", Some("n8n-nodes-base.set")),
    ]);

    let index = GroupingIndex::rebuild(&doc);
    let names: Vec<_> = index.nodes_in("set").iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["B", "A"]);
    assert_eq!(index.node_count(), 3);
  }

  #[test]
  fn test_category_fallbacks() {
    assert_eq!(category_of(Some("n8n-nodes-base.code")), "code");
    assert_eq!(category_of(Some("plain")), "plain");
    assert_eq!(category_of(None), "Unknown");
    assert_eq!(category_of(Some("n8n-nodes-base.")), "Other");
    assert_eq!(category_of(Some("")), "Unknown");
  }

  #[test]
  fn test_summary_fields() {
    let doc = doc_with(&[("", None)]);
    let index = GroupingIndex::rebuild(&doc);

    let summary = &index.nodes_in("Unknown")[0];
    assert_eq!(summary.identifier, "node-0");
    assert_eq!(summary.name, "Node 0");
    assert_eq!(summary.node_type, "Unknown");
    assert_eq!(summary.category, "Unknown");
  }

  #[test]
  fn test_empty_type_is_unknown() {
    let doc = doc_with(&[("Blank", Some(""))]);
    let index = GroupingIndex::rebuild(&doc);

    let summary = &index.nodes_in("Unknown")[0];
    assert_eq!(summary.name, "Blank");
    assert_eq!(summary.node_type, "Unknown");
    assert_eq!(index.categories().collect::<Vec<_>>(), vec!["Unknown"]);
  }

  #[test]
  fn test_empty_document() {
    let index = GroupingIndex::rebuild(&WorkflowDocument::new("empty"));
    assert!(index.is_empty());
    assert!(index.nodes_in("set").is_empty());
  }
}
