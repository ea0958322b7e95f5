//! Integration tests for decompose/recompose on a real directory.

use std::path::Path;

use flowsplit_config::{Node, WorkflowDocument};
use flowsplit_layout::{
  Layout, LayoutError, decompose, document_from_value, open_node, recompose, write_node,
};
use serde_json::json;

fn sample_workflow() -> WorkflowDocument {
  document_from_value(json!({
    "id": "wf-42",
    "name": "Order Sync",
    "active": false,
    "nodes": [
      {
        "id": "n-0",
        "name": "Webhook",
        "type": "n8n-nodes-base.webhook",
        "typeVersion": 2,
        "position": [0, 0],
        "parameters": { "path": "orders" },
        "webhookId": "abc-123"
      },
      {
        "id": "n-1",
        "name": "Transform",
        "type": "n8n-nodes-base.code",
        "typeVersion": 2,
        "position": [220, 0],
        "parameters": { "jsCode": "return items;", "mode": "runOnceForAllItems" }
      },
      {
        "id": "n-2",
        "name": "Store / Upsert",
        "type": "n8n-nodes-base.httpRequest",
        "typeVersion": 4.2,
        "position": [440, 0],
        "parameters": { "url": "https://example.com/orders", "method": "POST" },
        "credentials": { "httpHeaderAuth": { "id": "7", "name": "Orders API" } }
      }
    ],
    "connections": {
      "Webhook": { "main": [[{ "node": "Transform", "type": "main", "index": 0 }]] },
      "Transform": { "main": [[{ "node": "Store / Upsert", "type": "main", "index": 0 }]] }
    },
    "settings": { "executionOrder": "v1" },
    "versionId": "v-9"
  }))
  .expect("sample workflow is valid")
}

fn node_names(doc: &WorkflowDocument) -> Vec<&str> {
  doc.nodes.iter().map(|n| n.name.as_str()).collect()
}

fn file_names(dir: &Path) -> Vec<String> {
  let mut names: Vec<String> = std::fs::read_dir(dir)
    .unwrap()
    .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
    .collect();
  names.sort();
  names
}

#[tokio::test]
async fn test_decompose_writes_manifest_and_node_files() {
  let temp = tempfile::tempdir().unwrap();
  let dir = temp.path().join("order-sync");
  let doc = sample_workflow();

  let layout = decompose(&doc, &dir).await.unwrap();

  assert!(layout.manifest_path().exists());
  assert_eq!(
    file_names(&layout.nodes_dir()),
    vec!["0_Webhook.json", "1_Transform.json", "2_Store___Upsert.json"]
  );

  let written: Node =
    serde_json::from_str(&std::fs::read_to_string(layout.node_path("1_Transform")).unwrap())
      .unwrap();
  assert_eq!(written, doc.nodes[1]);
}

#[tokio::test]
async fn test_round_trip_without_edits() {
  let temp = tempfile::tempdir().unwrap();
  let doc = sample_workflow();

  decompose(&doc, temp.path()).await.unwrap();
  let back = recompose(temp.path()).await.unwrap();

  assert_eq!(back, doc);
}

#[tokio::test]
async fn test_decompose_replaces_previous_layout() {
  let temp = tempfile::tempdir().unwrap();
  let doc = sample_workflow();
  let layout = decompose(&doc, temp.path()).await.unwrap();
  std::fs::write(layout.nodes_dir().join("7_Stale.json"), "{}").unwrap();
  std::fs::write(layout.root().join("notes.txt"), "scratch").unwrap();

  let mut smaller = doc.clone();
  smaller.nodes.truncate(1);
  let layout = decompose(&smaller, temp.path()).await.unwrap();

  assert_eq!(file_names(&layout.nodes_dir()), vec!["0_Webhook.json"]);
  assert!(!layout.root().join("notes.txt").exists());
}

#[tokio::test]
async fn test_deleting_node_file_removes_node() {
  let temp = tempfile::tempdir().unwrap();
  let layout = decompose(&sample_workflow(), temp.path()).await.unwrap();

  std::fs::remove_file(layout.node_path("1_Transform")).unwrap();
  let back = recompose(temp.path()).await.unwrap();

  assert_eq!(node_names(&back), vec!["Webhook", "Store / Upsert"]);
}

#[tokio::test]
async fn test_order_follows_file_index_not_name() {
  let temp = tempfile::tempdir().unwrap();
  let layout = decompose(&sample_workflow(), temp.path()).await.unwrap();
  let nodes = layout.nodes_dir();

  std::fs::rename(nodes.join("0_Webhook.json"), nodes.join("5_Webhook.json")).unwrap();
  std::fs::rename(nodes.join("2_Store___Upsert.json"), nodes.join("02_Aaa.json")).unwrap();

  let back = recompose(temp.path()).await.unwrap();
  assert_eq!(node_names(&back), vec!["Transform", "Store / Upsert", "Webhook"]);
}

#[tokio::test]
async fn test_files_without_index_are_ignored() {
  let temp = tempfile::tempdir().unwrap();
  let layout = decompose(&sample_workflow(), temp.path()).await.unwrap();
  let nodes = layout.nodes_dir();

  std::fs::write(nodes.join("scratch.json"), "not json at all").unwrap();
  std::fs::write(nodes.join("notes.txt"), "todo").unwrap();
  std::fs::create_dir(nodes.join("backup")).unwrap();

  let back = recompose(temp.path()).await.unwrap();
  assert_eq!(back.nodes.len(), 3);
}

#[tokio::test]
async fn test_malformed_indexed_node_is_fatal() {
  let temp = tempfile::tempdir().unwrap();
  let layout = decompose(&sample_workflow(), temp.path()).await.unwrap();
  std::fs::write(layout.node_path("1_Transform"), "{ broken").unwrap();

  let err = recompose(temp.path()).await.unwrap_err();
  match err {
    LayoutError::Parse { path, .. } => assert_eq!(path, layout.node_path("1_Transform")),
    other => panic!("unexpected error: {other}"),
  }
}

#[tokio::test]
async fn test_missing_manifest() {
  let temp = tempfile::tempdir().unwrap();
  let layout = decompose(&sample_workflow(), temp.path()).await.unwrap();
  std::fs::remove_file(layout.manifest_path()).unwrap();

  let err = recompose(temp.path()).await.unwrap_err();
  assert!(matches!(err, LayoutError::MissingManifest(_)));
}

#[tokio::test]
async fn test_malformed_manifest_is_fatal() {
  let temp = tempfile::tempdir().unwrap();
  let layout = decompose(&sample_workflow(), temp.path()).await.unwrap();
  std::fs::write(layout.manifest_path(), "[1, 2").unwrap();

  let err = recompose(temp.path()).await.unwrap_err();
  assert!(matches!(err, LayoutError::Parse { .. }));
}

#[tokio::test]
async fn test_duplicate_index_fails_fast() {
  let temp = tempfile::tempdir().unwrap();
  let layout = decompose(&sample_workflow(), temp.path()).await.unwrap();
  std::fs::copy(
    layout.node_path("1_Transform"),
    layout.nodes_dir().join("1_Transform_copy.json"),
  )
  .unwrap();

  let err = recompose(temp.path()).await.unwrap_err();
  assert!(matches!(err, LayoutError::DuplicateNodeIndex { index: 1, .. }));
}

#[tokio::test]
async fn test_sidecar_edit_is_folded_back() {
  let temp = tempfile::tempdir().unwrap();
  let doc = sample_workflow();
  let layout = decompose(&doc, temp.path()).await.unwrap();

  let opened = open_node(&layout, 1).await.unwrap();
  let sidecar = opened.sidecar.expect("code node gets a sidecar");
  assert_eq!(sidecar.field, "jsCode");
  assert_eq!(std::fs::read_to_string(&sidecar.path).unwrap(), "return items;");
  assert!(sidecar.readme_path.ends_with("1_Transform_README.txt"));

  std::fs::write(&sidecar.path, "return items.filter(i => i.json.paid);").unwrap();
  let back = recompose(temp.path()).await.unwrap();

  let mut expected = doc.clone();
  expected.nodes[1]
    .parameters
    .as_mut()
    .unwrap()
    .insert("jsCode".into(), json!("return items.filter(i => i.json.paid);"));
  assert_eq!(back, expected);
}

#[tokio::test]
async fn test_reopening_keeps_pending_sidecar_edits() {
  let temp = tempfile::tempdir().unwrap();
  let layout = decompose(&sample_workflow(), temp.path()).await.unwrap();

  let sidecar = open_node(&layout, 1).await.unwrap().sidecar.unwrap();
  std::fs::write(&sidecar.path, "edited();").unwrap();
  open_node(&layout, 1).await.unwrap();

  assert_eq!(std::fs::read_to_string(&sidecar.path).unwrap(), "edited();");
}

#[tokio::test]
async fn test_open_node_without_code_has_no_sidecar() {
  let temp = tempfile::tempdir().unwrap();
  let layout = decompose(&sample_workflow(), temp.path()).await.unwrap();

  let opened = open_node(&layout, 0).await.unwrap();
  assert!(opened.sidecar.is_none());
  assert_eq!(file_names(&layout.nodes_dir()).len(), 3);

  let err = open_node(&layout, 9).await.unwrap_err();
  assert!(matches!(err, LayoutError::NodeNotFound(9)));
}

#[tokio::test]
async fn test_sidecar_for_node_without_code_field_is_ignored() {
  let temp = tempfile::tempdir().unwrap();
  let doc = sample_workflow();
  let layout = decompose(&doc, temp.path()).await.unwrap();
  std::fs::write(layout.sidecar_path("0_Webhook"), "console.log(1)").unwrap();

  let back = recompose(temp.path()).await.unwrap();
  assert_eq!(back.nodes[0], doc.nodes[0]);
}

#[tokio::test]
async fn test_renamed_node_keeps_its_connections() {
  let temp = tempfile::tempdir().unwrap();
  let doc = sample_workflow();
  let layout = decompose(&doc, temp.path()).await.unwrap();

  let mut renamed = doc.nodes[1].clone();
  renamed.name = "Normalize".to_string();
  std::fs::write(
    layout.node_path("1_Transform"),
    serde_json::to_string_pretty(&renamed).unwrap(),
  )
  .unwrap();

  let back = recompose(temp.path()).await.unwrap();
  let edges: Vec<_> = back.edges().collect();
  assert_eq!(
    edges,
    vec![("Normalize", "Store / Upsert"), ("Webhook", "Normalize")]
  );
}

#[tokio::test]
async fn test_rename_onto_deleted_node_name_keeps_both_edge_sets() {
  let temp = tempfile::tempdir().unwrap();
  let doc = sample_workflow();
  let layout = decompose(&doc, temp.path()).await.unwrap();

  std::fs::remove_file(layout.node_path("1_Transform")).unwrap();
  let mut renamed = doc.nodes[0].clone();
  renamed.name = "Transform".to_string();
  std::fs::write(
    layout.node_path("0_Webhook"),
    serde_json::to_string_pretty(&renamed).unwrap(),
  )
  .unwrap();

  let back = recompose(temp.path()).await.unwrap();
  let edges: Vec<_> = back.edges().collect();
  assert_eq!(
    edges,
    vec![("Transform", "Store / Upsert"), ("Webhook", "Transform")]
  );
}

#[tokio::test]
async fn test_swapped_names_relink() {
  let temp = tempfile::tempdir().unwrap();
  let doc = sample_workflow();
  let layout = decompose(&doc, temp.path()).await.unwrap();

  let swaps = [
    ("0_Webhook", &doc.nodes[0], "Transform"),
    ("1_Transform", &doc.nodes[1], "Webhook"),
  ];
  for (stem, node, name) in swaps {
    let mut renamed = node.clone();
    renamed.name = name.to_string();
    std::fs::write(
      layout.node_path(stem),
      serde_json::to_string_pretty(&renamed).unwrap(),
    )
    .unwrap();
  }

  let back = recompose(temp.path()).await.unwrap();
  let edges: Vec<_> = back.edges().collect();
  assert_eq!(
    edges,
    vec![("Transform", "Webhook"), ("Webhook", "Store / Upsert")]
  );
}

#[tokio::test]
async fn test_write_node_replaces_file_and_sidecar() {
  let temp = tempfile::tempdir().unwrap();
  let layout = decompose(&sample_workflow(), temp.path()).await.unwrap();
  open_node(&layout, 1).await.unwrap();

  let mut node = Node::new("Clean Up", "n8n-nodes-base.code");
  node.parameters = Some(serde_json::from_value(json!({ "jsCode": "cleanup();" })).unwrap());
  let path = write_node(&layout, 1, &node).await.unwrap();

  assert!(path.ends_with("1_Clean_Up.json"));
  assert_eq!(
    file_names(&layout.nodes_dir()),
    vec!["0_Webhook.json", "1_Clean_Up.json", "2_Store___Upsert.json"]
  );

  let back = recompose(temp.path()).await.unwrap();
  assert_eq!(back.nodes[1], node);
}

#[tokio::test]
async fn test_empty_workflow_round_trips() {
  let temp = tempfile::tempdir().unwrap();
  let doc = WorkflowDocument::new("Empty");

  let layout: Layout = decompose(&doc, temp.path()).await.unwrap();
  assert!(layout.nodes_dir().is_dir());
  assert_eq!(recompose(temp.path()).await.unwrap(), doc);
}
