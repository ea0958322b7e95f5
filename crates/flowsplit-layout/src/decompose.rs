use std::path::Path;

use flowsplit_config::WorkflowDocument;
use tokio::fs;
use tracing::{info, instrument};

use crate::codec;
use crate::document::write_json;
use crate::error::LayoutError;
use crate::layout::Layout;

/// Write `doc` out as a fresh layout under `target_dir`.
///
/// Anything already at `target_dir` is removed first. A failed write leaves
/// whatever was written so far in place.
#[instrument(
  name = "decompose",
  skip(doc, target_dir),
  fields(workflow_id = ?doc.id, dir = %target_dir.as_ref().display())
)]
pub async fn decompose(
  doc: &WorkflowDocument,
  target_dir: impl AsRef<Path>,
) -> Result<Layout, LayoutError> {
  let layout = Layout::new(target_dir.as_ref());

  match fs::remove_dir_all(layout.root()).await {
    Ok(()) => info!("removed previous layout"),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
    Err(e) => return Err(LayoutError::io(layout.root())(e)),
  }

  let nodes_dir = layout.nodes_dir();
  fs::create_dir_all(&nodes_dir)
    .await
    .map_err(LayoutError::io(&nodes_dir))?;

  write_json(&layout.manifest_path(), doc).await?;

  for (index, node) in doc.nodes.iter().enumerate() {
    let stem = codec::node_file_stem(index, node);
    write_json(&layout.node_path(&stem), node).await?;
  }

  info!(node_count = doc.nodes.len(), "workflow decomposed");
  Ok(layout)
}
