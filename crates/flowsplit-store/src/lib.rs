//! Flowsplit Store
//!
//! The remote side of a workflow editing session. The [`WorkflowStore`] trait
//! covers listing, fetching, creating, updating and deleting workflows.
//!
//! - [`HttpStore`] talks to the n8n public REST API (`/api/v1/workflows`)
//!   authenticated with an `X-N8N-API-KEY` header.
//! - [`MemoryStore`] keeps workflows in memory, for tests and offline use.
//!
//! Updates never send a document verbatim: [`UpdatePayload`] keeps only the
//! fields the API accepts on write.

mod config;
mod http;
mod memory;
mod types;

pub use config::StoreConfig;
pub use http::HttpStore;
pub use memory::MemoryStore;
pub use types::{NodePayload, UpdatePayload, WorkflowSummary};

use async_trait::async_trait;
use flowsplit_config::WorkflowDocument;

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// Base URL or API key missing.
  #[error("workflow store is not configured: an API URL and API key are required")]
  NotConfigured,

  #[error("invalid API URL: {0}")]
  InvalidUrl(#[from] url::ParseError),

  /// The API answered with a non-success status.
  #[error("API request failed: {status} {reason}")]
  Api { status: u16, reason: String },

  /// The request could not be sent or the response could not be decoded.
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The requested workflow does not exist.
  #[error("workflow not found: {0}")]
  NotFound(String),
}

/// Remote workflow storage.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
  /// List all workflows.
  async fn list(&self) -> Result<Vec<WorkflowSummary>, Error>;

  /// Fetch one workflow with its nodes and connections.
  async fn get(&self, id: &str) -> Result<WorkflowDocument, Error>;

  /// Create a workflow. The store assigns the id.
  async fn create(&self, workflow: &WorkflowDocument) -> Result<WorkflowDocument, Error>;

  /// Replace a workflow. Only the fields in [`UpdatePayload`] are written.
  async fn update(&self, id: &str, workflow: &WorkflowDocument)
  -> Result<WorkflowDocument, Error>;

  /// Delete a workflow.
  async fn delete(&self, id: &str) -> Result<(), Error>;

  /// Check that the store is reachable and the credentials are accepted.
  async fn test_connection(&self) -> bool {
    match self.list().await {
      Ok(_) => true,
      Err(e) => {
        tracing::warn!(error = %e, "workflow store connection check failed");
        false
      }
    }
  }
}
