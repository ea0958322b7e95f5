use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use flowsplit_config::{ConnectionGraph, Node, WorkflowDocument};
use serde_json::Value;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

use crate::code;
use crate::error::LayoutError;
use crate::layout::{Layout, NodeFile};

/// Reassemble the layout under `target_dir` into one document.
///
/// Nodes are ordered by the index in their file names; missing indices are
/// dropped. Code sidecars replace the code field of their node. Connections
/// pointing at a node that was renamed in its file are rewritten to the new
/// name when the node kept its `id`.
#[instrument(name = "recompose", skip(target_dir), fields(dir = %target_dir.as_ref().display()))]
pub async fn recompose(target_dir: impl AsRef<Path>) -> Result<WorkflowDocument, LayoutError> {
  let layout = Layout::new(target_dir.as_ref());
  let (mut doc, snapshot) = read_manifest(&layout).await?;

  let files = layout.scan().await?;
  let mut nodes = Vec::with_capacity(files.len());
  for file in files.values() {
    nodes.push(read_node(&layout, file).await?);
  }

  doc.nodes = nodes;
  relink_renamed_nodes(&mut doc, &snapshot);
  warn_dangling_connections(&doc);

  info!(
    workflow_id = ?doc.id,
    node_count = doc.nodes.len(),
    "workflow recomposed"
  );
  Ok(doc)
}

/// Read the manifest, returning the document and the nodes it was written with.
async fn read_manifest(layout: &Layout) -> Result<(WorkflowDocument, Vec<Node>), LayoutError> {
  let path = layout.manifest_path();
  let content = match fs::read_to_string(&path).await {
    Ok(content) => content,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
      return Err(LayoutError::MissingManifest(path));
    }
    Err(e) => return Err(LayoutError::io(&path)(e)),
  };

  let mut value: Value = serde_json::from_str(&content).map_err(LayoutError::parse(&path))?;
  let Some(object) = value.as_object_mut() else {
    return Err(LayoutError::InvalidWorkflow(format!(
      "{} is not a JSON object",
      path.display()
    )));
  };

  let snapshot = match object.insert("nodes".to_string(), Value::Array(Vec::new())) {
    Some(nodes @ Value::Array(_)) => {
      serde_json::from_value(nodes).map_err(LayoutError::parse(&path))?
    }
    _ => Vec::new(),
  };

  let doc = serde_json::from_value(value).map_err(LayoutError::parse(&path))?;
  Ok((doc, snapshot))
}

async fn read_node(layout: &Layout, file: &NodeFile) -> Result<Node, LayoutError> {
  let content = fs::read_to_string(&file.path)
    .await
    .map_err(LayoutError::io(&file.path))?;
  let node: Node = serde_json::from_str(&content).map_err(LayoutError::parse(&file.path))?;

  let sidecar_path = layout.sidecar_path(&file.stem);
  let sidecar = match fs::read_to_string(&sidecar_path).await {
    Ok(sidecar) => sidecar,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(node),
    Err(e) => return Err(LayoutError::io(&sidecar_path)(e)),
  };

  match code::sidecar_field(&node) {
    Some(field) => {
      debug!(index = file.index, field, "folding code sidecar into node");
      code::reinsert(&node, field, &sidecar)
    }
    None => {
      warn!(
        index = file.index,
        path = %sidecar_path.display(),
        "node has no code field, ignoring sidecar"
      );
      Ok(node)
    }
  }
}

/// Rewrite connection endpoints for nodes whose name changed but whose `id` did not.
fn relink_renamed_nodes(doc: &mut WorkflowDocument, snapshot: &[Node]) {
  let old_names: BTreeMap<&str, &str> = snapshot
    .iter()
    .filter_map(|n| Some((n.id.as_deref()?, n.name.as_str())))
    .collect();

  let mut renames: BTreeMap<String, String> = doc
    .nodes
    .iter()
    .filter_map(|n| {
      let old = *old_names.get(n.id.as_deref()?)?;
      (old != n.name).then(|| (old.to_string(), n.name.clone()))
    })
    .collect();

  // A new name that is still an endpoint not being renamed away would merge
  // two nodes' edges under one key.
  let endpoints: HashSet<&str> = doc
    .connections
    .iter()
    .flat_map(|(source, ports)| {
      std::iter::once(source.as_str()).chain(
        ports
          .values()
          .flatten()
          .flatten()
          .map(|target| target.node.as_str()),
      )
    })
    .collect();
  let taken: Vec<String> = renames
    .iter()
    .filter(|(_, new)| endpoints.contains(new.as_str()) && !renames.contains_key(new.as_str()))
    .map(|(old, _)| old.clone())
    .collect();
  for old in taken {
    if let Some(new) = renames.remove(&old) {
      warn!(from = %old, to = %new, "renamed node takes a name still used in connections, not relinking");
    }
  }

  if renames.is_empty() {
    return;
  }

  for (old, new) in &renames {
    info!(from = %old, to = %new, "relinking connections for renamed node");
  }

  let rename = |name: &str| renames.get(name).cloned().unwrap_or_else(|| name.to_string());

  let connections = std::mem::take(&mut doc.connections);
  doc.connections = connections
    .into_iter()
    .map(|(source, mut ports)| {
      for target in ports.values_mut().flatten().flatten() {
        target.node = rename(&target.node);
      }
      (rename(&source), ports)
    })
    .collect::<ConnectionGraph>();
}

fn warn_dangling_connections(doc: &WorkflowDocument) {
  let names: HashSet<&str> = doc.nodes.iter().map(|n| n.name.as_str()).collect();

  for (source, target) in doc.edges() {
    if !names.contains(source) || !names.contains(target) {
      warn!(source, target, "connection references a node that no longer exists");
    }
  }
}
