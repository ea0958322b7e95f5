use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use flowsplit_config::WorkflowDocument;
use tokio::sync::RwLock;

use crate::types::{UpdatePayload, WorkflowSummary};
use crate::{Error, WorkflowStore};

struct Entry {
  workflow: WorkflowDocument,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

/// In-memory workflow store.
///
/// Writes go through [`UpdatePayload`] just like the HTTP store, so what
/// comes back from `get` is what the remote API would have kept.
#[derive(Default)]
pub struct MemoryStore {
  workflows: RwLock<BTreeMap<String, Entry>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Seed the store with a workflow, keeping its id or assigning a new one.
  pub async fn insert(&self, mut workflow: WorkflowDocument) -> String {
    let id = workflow
      .id
      .clone()
      .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    workflow.id = Some(id.clone());

    let now = Utc::now();
    self.workflows.write().await.insert(
      id.clone(),
      Entry {
        workflow,
        created_at: now,
        updated_at: now,
      },
    );
    id
  }

  fn apply(target: &mut WorkflowDocument, source: &WorkflowDocument) -> Result<(), Error> {
    let payload = UpdatePayload::from(source);
    let written: WorkflowDocument = serde_json::to_value(&payload)
      .and_then(serde_json::from_value)
      .map_err(|e| Error::Api {
        status: 400,
        reason: e.to_string(),
      })?;

    target.name = written.name;
    target.nodes = written.nodes;
    target.connections = written.connections;
    target.settings = written.settings;
    Ok(())
  }
}

#[async_trait]
impl WorkflowStore for MemoryStore {
  async fn list(&self) -> Result<Vec<WorkflowSummary>, Error> {
    let workflows = self.workflows.read().await;
    Ok(
      workflows
        .iter()
        .map(|(id, entry)| WorkflowSummary {
          id: id.clone(),
          name: entry.workflow.name.clone(),
          active: entry.workflow.active,
          created_at: entry.created_at,
          updated_at: entry.updated_at,
        })
        .collect(),
    )
  }

  async fn get(&self, id: &str) -> Result<WorkflowDocument, Error> {
    self
      .workflows
      .read()
      .await
      .get(id)
      .map(|entry| entry.workflow.clone())
      .ok_or_else(|| Error::NotFound(id.to_string()))
  }

  async fn create(&self, workflow: &WorkflowDocument) -> Result<WorkflowDocument, Error> {
    let mut created = WorkflowDocument::new(String::new());
    Self::apply(&mut created, workflow)?;
    created.id = None;

    let id = self.insert(created).await;
    self.get(&id).await
  }

  async fn update(
    &self,
    id: &str,
    workflow: &WorkflowDocument,
  ) -> Result<WorkflowDocument, Error> {
    let mut workflows = self.workflows.write().await;
    let entry = workflows
      .get_mut(id)
      .ok_or_else(|| Error::NotFound(id.to_string()))?;

    Self::apply(&mut entry.workflow, workflow)?;
    entry.updated_at = Utc::now();
    Ok(entry.workflow.clone())
  }

  async fn delete(&self, id: &str) -> Result<(), Error> {
    self
      .workflows
      .write()
      .await
      .remove(id)
      .map(|_| ())
      .ok_or_else(|| Error::NotFound(id.to_string()))
  }
}
