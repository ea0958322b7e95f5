use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
  /// The document has no usable `nodes` sequence or is not a JSON object.
  #[error("invalid workflow: {0}")]
  InvalidWorkflow(String),

  #[error("invalid node '{name}': {reason}")]
  InvalidNode { name: String, reason: String },

  #[error("workflow manifest not found: {}", .0.display())]
  MissingManifest(PathBuf),

  #[error("no node file with index {0}")]
  NodeNotFound(usize),

  #[error(
    "node index {index} is used by both {} and {}",
    first.display(),
    second.display()
  )]
  DuplicateNodeIndex {
    index: usize,
    first: PathBuf,
    second: PathBuf,
  },

  #[error("malformed JSON in {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("io error on {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl LayoutError {
  pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
    move |source| Self::Io {
      path: path.to_path_buf(),
      source,
    }
  }

  pub(crate) fn parse(path: &Path) -> impl FnOnce(serde_json::Error) -> Self + '_ {
    move |source| Self::Parse {
      path: path.to_path_buf(),
      source,
    }
  }
}
