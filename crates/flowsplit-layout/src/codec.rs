//! File and folder naming for decomposed layouts.
//!
//! Every function here is total: any input produces a usable name.

use flowsplit_config::{Node, WorkflowDocument};

/// Replace every character outside `[A-Za-z0-9]` with `_`.
///
/// Falls back to `{fallback_prefix}_{index}` when `name` is empty.
pub fn sanitize(name: &str, fallback_prefix: &str, index: usize) -> String {
  let sanitized: String = name
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
    .collect();

  if sanitized.is_empty() {
    format!("{fallback_prefix}_{index}")
  } else {
    sanitized
  }
}

/// File stem for the node at `index`, e.g. `3_HTTP_Request`.
///
/// Only the leading index is read back; the name part is for humans.
pub fn node_file_stem(index: usize, node: &Node) -> String {
  format!("{index}_{}", sanitize(&node.name, "node", index))
}

/// Parse the positional index out of a node file stem.
/// Example: "12_Set_Fields" -> Some(12), "notes" -> None
pub fn parse_index(file_stem: &str) -> Option<usize> {
  let digits_end = file_stem
    .find(|c: char| !c.is_ascii_digit())
    .unwrap_or(file_stem.len());

  if digits_end == 0 || !file_stem[digits_end..].starts_with('_') {
    return None;
  }

  file_stem[..digits_end].parse().ok()
}

/// Folder name for a workflow's layout directory.
///
/// Persisted workflows get their id appended so that two workflows sharing a
/// display name never share a folder.
pub fn workflow_folder_name(doc: &WorkflowDocument) -> String {
  let name = sanitize(&doc.name, "workflow", 0);
  match &doc.id {
    Some(id) => format!("{name}_{}", sanitize(id, "id", 0)),
    None => name,
  }
}
