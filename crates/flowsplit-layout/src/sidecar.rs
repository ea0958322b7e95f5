use std::path::PathBuf;

use flowsplit_config::Node;
use tokio::fs;
use tracing::{debug, info};

use crate::code::{self, EmbeddedCode};
use crate::codec;
use crate::document::write_json;
use crate::error::LayoutError;
use crate::layout::{Layout, NodeFile, SIDECAR_EXTENSION};

/// A node prepared for editing.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenedNode {
  pub index: usize,
  pub node: Node,
  pub node_path: PathBuf,
  /// Present when the node carries embedded code.
  pub sidecar: Option<Sidecar>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidecar {
  pub field: &'static str,
  pub path: PathBuf,
  pub readme_path: PathBuf,
}

/// Prepare the node at `index` for editing.
///
/// If the node has embedded code, its code is written to `{stem}.js` next to
/// the node file together with a short README. An existing sidecar is left
/// untouched so pending edits survive reopening the node.
pub async fn open_node(layout: &Layout, index: usize) -> Result<OpenedNode, LayoutError> {
  let file = layout.find(index).await?;
  let content = fs::read_to_string(&file.path)
    .await
    .map_err(LayoutError::io(&file.path))?;
  let node: Node = serde_json::from_str(&content).map_err(LayoutError::parse(&file.path))?;

  let sidecar = match code::extract(&node) {
    Some(code) => Some(write_sidecar(layout, &file, &node, code).await?),
    None => None,
  };

  Ok(OpenedNode {
    index,
    node,
    node_path: file.path,
    sidecar,
  })
}

async fn write_sidecar(
  layout: &Layout,
  file: &NodeFile,
  node: &Node,
  code: EmbeddedCode,
) -> Result<Sidecar, LayoutError> {
  let path = layout.sidecar_path(&file.stem);
  let exists = fs::try_exists(&path)
    .await
    .map_err(LayoutError::io(&path))?;

  if exists {
    debug!(index = file.index, path = %path.display(), "sidecar already present");
  } else {
    fs::write(&path, &code.content)
      .await
      .map_err(LayoutError::io(&path))?;
    info!(index = file.index, field = code.field, path = %path.display(), "code sidecar created");
  }

  let readme_path = layout.readme_path(&file.stem);
  fs::write(&readme_path, readme(&file.stem, node, code.field))
    .await
    .map_err(LayoutError::io(&readme_path))?;

  Ok(Sidecar {
    field: code.field,
    path,
    readme_path,
  })
}

fn readme(stem: &str, node: &Node, field: &str) -> String {
  let node_type = node.node_type.as_deref().unwrap_or("unknown type");
  format!(
    "{stem}.{SIDECAR_EXTENSION} holds the `{field}` parameter of node \"{name}\" ({node_type}).\n\
     \n\
     Edit it with any editor. When the workflow is saved, the whole file\n\
     replaces the node's `{field}` value in {stem}.json.\n\
     \n\
     Delete {stem}.{SIDECAR_EXTENSION} to keep the code stored in {stem}.json instead.\n\
     Deleting {stem}.json removes the node from the workflow.\n",
    name = node.name,
  )
}

/// Replace the node at `index` with `node`.
///
/// The previous node file and any sidecar or README for it are removed, so
/// the new node content is authoritative on the next recompose. The file is
/// renamed when the node name changes.
pub async fn write_node(layout: &Layout, index: usize, node: &Node) -> Result<PathBuf, LayoutError> {
  let previous = layout.find(index).await?;

  for stale in [
    previous.path.clone(),
    layout.sidecar_path(&previous.stem),
    layout.readme_path(&previous.stem),
  ] {
    match fs::remove_file(&stale).await {
      Ok(()) => {}
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
      Err(e) => return Err(LayoutError::io(&stale)(e)),
    }
  }

  let path = layout.node_path(&codec::node_file_stem(index, node));
  write_json(&path, node).await?;
  info!(index, path = %path.display(), "node file written");
  Ok(path)
}
