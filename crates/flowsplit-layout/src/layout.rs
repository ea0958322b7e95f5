use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::codec;
use crate::error::LayoutError;

/// Manifest file name inside a layout directory.
pub const MANIFEST_FILE: &str = "workflow.json";

/// Directory holding one JSON file per node.
pub const NODES_DIR: &str = "nodes";

/// Extension of code sidecar files.
pub const SIDECAR_EXTENSION: &str = "js";

/// Suffix appended to a node stem for the sidecar instructions file.
pub const README_SUFFIX: &str = "_README.txt";

/// Handle to a decomposed workflow on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
  root: PathBuf,
}

/// A node file found while scanning a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeFile {
  pub index: usize,
  pub stem: String,
  pub path: PathBuf,
}

impl Layout {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn manifest_path(&self) -> PathBuf {
    self.root.join(MANIFEST_FILE)
  }

  pub fn nodes_dir(&self) -> PathBuf {
    self.root.join(NODES_DIR)
  }

  pub fn node_path(&self, stem: &str) -> PathBuf {
    self.nodes_dir().join(format!("{stem}.json"))
  }

  pub fn sidecar_path(&self, stem: &str) -> PathBuf {
    self
      .nodes_dir()
      .join(format!("{stem}.{SIDECAR_EXTENSION}"))
  }

  pub fn readme_path(&self, stem: &str) -> PathBuf {
    self.nodes_dir().join(format!("{stem}{README_SUFFIX}"))
  }

  /// List node files keyed by their positional index.
  ///
  /// Files that are not `.json` or whose stem has no index are skipped. Two
  /// files claiming the same index is an error.
  pub async fn scan(&self) -> Result<BTreeMap<usize, NodeFile>, LayoutError> {
    let nodes_dir = self.nodes_dir();
    let mut files: BTreeMap<usize, NodeFile> = BTreeMap::new();

    let mut entries = match fs::read_dir(&nodes_dir).await {
      Ok(entries) => entries,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(files),
      Err(e) => return Err(LayoutError::io(&nodes_dir)(e)),
    };

    while let Some(entry) = entries
      .next_entry()
      .await
      .map_err(LayoutError::io(&nodes_dir))?
    {
      let path = entry.path();
      if path.extension().and_then(|e| e.to_str()) != Some("json") {
        continue;
      }

      let stem = match path.file_stem().and_then(|s| s.to_str()) {
        Some(s) => s.to_string(),
        None => continue,
      };

      let Some(index) = codec::parse_index(&stem) else {
        tracing::debug!(path = %path.display(), "skipping file without node index");
        continue;
      };

      if let Some(existing) = files.get(&index) {
        let (first, second) = if existing.path <= path {
          (existing.path.clone(), path)
        } else {
          (path, existing.path.clone())
        };
        return Err(LayoutError::DuplicateNodeIndex {
          index,
          first,
          second,
        });
      }

      files.insert(index, NodeFile { index, stem, path });
    }

    Ok(files)
  }

  /// Find the node file for one index.
  pub async fn find(&self, index: usize) -> Result<NodeFile, LayoutError> {
    self
      .scan()
      .await?
      .remove(&index)
      .ok_or(LayoutError::NodeNotFound(index))
  }
}
