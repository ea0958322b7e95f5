use async_trait::async_trait;
use flowsplit_config::WorkflowDocument;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use crate::config::StoreConfig;
use crate::types::{ListPage, UpdatePayload, WorkflowSummary};
use crate::{Error, WorkflowStore};

const API_KEY_HEADER: &str = "X-N8N-API-KEY";
const WORKFLOWS_ENDPOINT: &str = "/api/v1/workflows";

/// Workflow store backed by the n8n public REST API.
pub struct HttpStore {
  client: Client,
  config: StoreConfig,
}

impl HttpStore {
  pub fn new(config: StoreConfig) -> Self {
    Self {
      client: Client::new(),
      config,
    }
  }

  pub fn config(&self) -> &StoreConfig {
    &self.config
  }

  pub fn is_configured(&self) -> bool {
    self.config.is_configured()
  }

  /// Build `{base_url}{endpoint}`, tolerating a trailing slash on the base.
  fn url(&self, endpoint: &str) -> Result<Url, Error> {
    let base = match &self.config.base_url {
      Some(base) if self.is_configured() => base.trim().trim_end_matches('/'),
      _ => return Err(Error::NotConfigured),
    };
    Ok(Url::parse(&format!("{base}{endpoint}"))?)
  }

  fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, Error> {
    let api_key = self.config.api_key.as_deref().ok_or(Error::NotConfigured)?;
    debug!(%method, %url, "sending workflow store request");
    Ok(
      self
        .client
        .request(method, url)
        .header(API_KEY_HEADER, api_key.trim()),
    )
  }

  async fn send(&self, request: RequestBuilder) -> Result<Response, Error> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
      return Err(Error::Api {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("unknown").to_string(),
      });
    }
    Ok(response)
  }

  async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, Error> {
    Ok(self.send(request).await?.json().await?)
  }

  fn workflow_url(&self, id: &str) -> Result<Url, Error> {
    let mut url = self.url(WORKFLOWS_ENDPOINT)?;
    url
      .path_segments_mut()
      .map_err(|_| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
      .push(id);
    Ok(url)
  }
}

#[async_trait]
impl WorkflowStore for HttpStore {
  async fn list(&self) -> Result<Vec<WorkflowSummary>, Error> {
    let mut workflows = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
      let mut url = self.url(WORKFLOWS_ENDPOINT)?;
      if let Some(cursor) = &cursor {
        url.query_pairs_mut().append_pair("cursor", cursor);
      }

      let page: ListPage = self.send_json(self.request(Method::GET, url)?).await?;
      workflows.extend(page.data);

      match page.next_cursor {
        Some(next) if !next.is_empty() => cursor = Some(next),
        _ => break,
      }
    }

    debug!(count = workflows.len(), "listed workflows");
    Ok(workflows)
  }

  async fn get(&self, id: &str) -> Result<WorkflowDocument, Error> {
    let url = self.workflow_url(id)?;
    match self.send_json(self.request(Method::GET, url)?).await {
      Err(Error::Api { status: 404, .. }) => Err(Error::NotFound(id.to_string())),
      other => other,
    }
  }

  async fn create(&self, workflow: &WorkflowDocument) -> Result<WorkflowDocument, Error> {
    let url = self.url(WORKFLOWS_ENDPOINT)?;
    let payload = UpdatePayload::from(workflow);
    let created: WorkflowDocument = self
      .send_json(self.request(Method::POST, url)?.json(&payload))
      .await?;
    info!(workflow_id = ?created.id, name = %created.name, "workflow created");
    Ok(created)
  }

  async fn update(
    &self,
    id: &str,
    workflow: &WorkflowDocument,
  ) -> Result<WorkflowDocument, Error> {
    let url = self.workflow_url(id)?;
    let payload = UpdatePayload::from(workflow);
    let updated = self
      .send_json(self.request(Method::PUT, url)?.json(&payload))
      .await?;
    info!(workflow_id = %id, node_count = payload.nodes.len(), "workflow updated");
    Ok(updated)
  }

  async fn delete(&self, id: &str) -> Result<(), Error> {
    let url = self.workflow_url(id)?;
    self.send(self.request(Method::DELETE, url)?).await?;
    info!(workflow_id = %id, "workflow deleted");
    Ok(())
  }
}
