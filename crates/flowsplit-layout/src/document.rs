use std::path::Path;

use flowsplit_config::WorkflowDocument;
use serde_json::Value;
use tokio::fs;

use crate::error::LayoutError;

/// Turn raw JSON into a document, rejecting anything without a `nodes` array.
pub fn document_from_value(value: Value) -> Result<WorkflowDocument, LayoutError> {
  match value.get("nodes") {
    Some(Value::Array(_)) => {}
    Some(_) => {
      return Err(LayoutError::InvalidWorkflow(
        "`nodes` must be an array".to_string(),
      ));
    }
    None => {
      return Err(LayoutError::InvalidWorkflow(
        "document has no `nodes` field".to_string(),
      ));
    }
  }

  serde_json::from_value(value).map_err(|e| LayoutError::InvalidWorkflow(e.to_string()))
}

/// Read and validate a single-file workflow document.
pub async fn read_document(path: &Path) -> Result<WorkflowDocument, LayoutError> {
  let content = fs::read_to_string(path)
    .await
    .map_err(LayoutError::io(path))?;
  let value: Value = serde_json::from_str(&content).map_err(LayoutError::parse(path))?;
  document_from_value(value)
}

/// Write a document as pretty-printed JSON, creating parent directories.
pub async fn write_document(doc: &WorkflowDocument, path: &Path) -> Result<(), LayoutError> {
  write_json(path, doc).await
}

pub(crate) async fn write_json<T: serde::Serialize>(
  path: &Path,
  value: &T,
) -> Result<(), LayoutError> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    fs::create_dir_all(parent)
      .await
      .map_err(LayoutError::io(parent))?;
  }

  let content = serde_json::to_string_pretty(value).map_err(LayoutError::parse(path))?;
  fs::write(path, content)
    .await
    .map_err(LayoutError::io(path))
}
