use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
  #[error("no workflow is open")]
  NoOpenWorkflow,

  #[error("workflow has no id and no file to save to")]
  NoSaveTarget,

  #[error(transparent)]
  Layout(#[from] flowsplit_layout::LayoutError),

  #[error(transparent)]
  Store(#[from] flowsplit_store::Error),
}
