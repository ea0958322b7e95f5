//! Behaviour of the in-memory store through the `WorkflowStore` trait.

use flowsplit_config::{Node, WorkflowDocument};
use flowsplit_store::{Error, MemoryStore, WorkflowStore};
use serde_json::json;

fn workflow(name: &str) -> WorkflowDocument {
  let mut doc = WorkflowDocument::new(name);
  doc.active = true;
  doc.nodes.push(Node::new("Start", "n8n-nodes-base.manualTrigger"));
  doc
}

#[tokio::test]
async fn test_create_assigns_id_and_lists() {
  let store = MemoryStore::new();

  let created = store.create(&workflow("First")).await.unwrap();
  let id = created.id.clone().expect("store assigns an id");

  let listed = store.list().await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].id, id);
  assert_eq!(listed[0].name, "First");
  // `active` is not writable through the API
  assert!(!listed[0].active);
}

#[tokio::test]
async fn test_update_keeps_only_writable_fields() {
  let store = MemoryStore::new();
  let id = store.insert(workflow("Orders")).await;

  let mut edited = store.get(&id).await.unwrap();
  edited.name = "Orders v2".to_string();
  edited.nodes[0].extra.insert("notes".into(), json!("local only"));
  edited.version_id = Some("changed".to_string());

  let updated = store.update(&id, &edited).await.unwrap();
  assert_eq!(updated.name, "Orders v2");
  assert!(updated.nodes[0].extra.is_empty());
  assert_eq!(updated.version_id, None);
  assert_eq!(updated.settings, Some(json!({})));
  assert!(updated.active);
}

#[tokio::test]
async fn test_missing_workflow() {
  let store = MemoryStore::new();
  assert!(matches!(store.get("nope").await, Err(Error::NotFound(_))));
  assert!(matches!(
    store.update("nope", &workflow("x")).await,
    Err(Error::NotFound(_))
  ));
  assert!(matches!(store.delete("nope").await, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_delete() {
  let store = MemoryStore::new();
  let id = store.insert(workflow("Temp")).await;

  store.delete(&id).await.unwrap();
  assert!(store.list().await.unwrap().is_empty());
  assert!(store.test_connection().await);
}
