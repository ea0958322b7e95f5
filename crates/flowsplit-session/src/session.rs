use std::path::{Path, PathBuf};
use std::sync::Arc;

use flowsplit_config::{Node, WorkflowDocument};
use flowsplit_index::{IndexObserver, WorkflowView};
use flowsplit_layout::{Layout, LayoutError, OpenedNode, codec};
use flowsplit_store::WorkflowStore;
use tracing::{info, instrument};

use crate::error::SessionError;

/// Where a recomposed workflow is written on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
  /// Update the workflow with this id in the remote store.
  Remote(String),
  /// Overwrite this single-file workflow document.
  File(PathBuf),
  /// Nowhere yet; `save` fails until a target is set.
  Unbound,
}

/// The workflow a session currently has open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenWorkflow {
  pub layout: Layout,
  pub target: SaveTarget,
  /// File index of the node at each view position.
  files: Vec<usize>,
}

impl OpenWorkflow {
  /// File index backing the node at view `position`.
  pub fn file_index(&self, position: usize) -> Option<usize> {
    self.files.get(position).copied()
  }

  /// View position of the node stored under file `index`.
  pub fn position_of(&self, index: usize) -> Option<usize> {
    self.files.iter().position(|&f| f == index)
  }
}

pub struct Session<S> {
  store: S,
  layouts_root: PathBuf,
  current: Option<OpenWorkflow>,
  view: WorkflowView,
}

impl<S: WorkflowStore> Session<S> {
  /// Create a session whose layouts are written under `layouts_root`.
  pub fn new(store: S, layouts_root: impl Into<PathBuf>) -> Self {
    Self {
      store,
      layouts_root: layouts_root.into(),
      current: None,
      view: WorkflowView::new(),
    }
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  pub fn current(&self) -> Option<&OpenWorkflow> {
    self.current.as_ref()
  }

  pub fn view(&self) -> &WorkflowView {
    &self.view
  }

  pub fn subscribe(&mut self, observer: Arc<dyn IndexObserver>) {
    self.view.subscribe(observer);
  }

  /// Fetch a workflow from the store and decompose it into a fresh layout.
  #[instrument(name = "open_remote", skip(self))]
  pub async fn open_remote(&mut self, id: &str) -> Result<&Layout, SessionError> {
    let doc = self.store.get(id).await?;
    self.open(doc, SaveTarget::Remote(id.to_string())).await
  }

  /// Load a single-file workflow and decompose it. Saves go back to `path`.
  #[instrument(name = "open_file", skip(self), fields(path = %path.display()))]
  pub async fn open_file(&mut self, path: &Path) -> Result<&Layout, SessionError> {
    let doc = flowsplit_layout::read_document(path).await?;
    self.open(doc, SaveTarget::File(path.to_path_buf())).await
  }

  /// Decompose `doc` into `{layouts_root}/{folder}` and make it current.
  pub async fn open(
    &mut self,
    doc: WorkflowDocument,
    target: SaveTarget,
  ) -> Result<&Layout, SessionError> {
    let dir = self.layouts_root.join(codec::workflow_folder_name(&doc));
    let layout = flowsplit_layout::decompose(&doc, &dir).await?;
    info!(dir = %dir.display(), ?target, "workflow opened");

    let files = (0..doc.nodes.len()).collect();
    self.view.load(doc);
    let current = self.current.insert(OpenWorkflow {
      layout,
      target,
      files,
    });
    Ok(&current.layout)
  }

  /// Resume a layout written earlier, e.g. by a previous process.
  ///
  /// The layout is left as found; view positions map onto its file indices,
  /// which may have gaps.
  pub async fn attach(
    &mut self,
    layout_dir: impl Into<PathBuf>,
    target: SaveTarget,
  ) -> Result<&WorkflowDocument, SessionError> {
    let layout = Layout::new(layout_dir);
    let doc = flowsplit_layout::recompose(layout.root()).await?;
    let files = layout.scan().await?.into_keys().collect();

    self.view.load(doc);
    self.current = Some(OpenWorkflow {
      layout,
      target,
      files,
    });
    self.view.document().ok_or(SessionError::NoOpenWorkflow)
  }

  /// Point saves somewhere else.
  pub fn set_target(&mut self, target: SaveTarget) -> Result<(), SessionError> {
    let current = self.current.as_mut().ok_or(SessionError::NoOpenWorkflow)?;
    current.target = target;
    Ok(())
  }

  /// Prepare the node at view `position` for editing, creating its code
  /// sidecar if it has code.
  pub async fn open_node(&self, position: usize) -> Result<OpenedNode, SessionError> {
    let current = self.current.as_ref().ok_or(SessionError::NoOpenWorkflow)?;
    let index = current
      .file_index(position)
      .ok_or(LayoutError::NodeNotFound(position))?;
    Ok(flowsplit_layout::open_node(&current.layout, index).await?)
  }

  /// Replace the node at view `position` in the layout and the view.
  ///
  /// Returns `false` if there is no node at `position`.
  pub async fn update_node(&mut self, position: usize, node: Node) -> Result<bool, SessionError> {
    let current = self.current.as_ref().ok_or(SessionError::NoOpenWorkflow)?;
    let Some(index) = current.file_index(position) else {
      return Ok(false);
    };
    if self.view.node(position).is_none() {
      return Ok(false);
    }

    flowsplit_layout::write_node(&current.layout, index, &node).await?;
    Ok(self.view.update_one(position, node))
  }

  /// Recompose the layout and write the result to the save target.
  ///
  /// On success the layout is rewritten from the saved document, so file
  /// indices line up with view positions again.
  #[instrument(name = "save", skip(self))]
  pub async fn save(&mut self) -> Result<WorkflowDocument, SessionError> {
    let current = self.current.as_mut().ok_or(SessionError::NoOpenWorkflow)?;
    let doc = flowsplit_layout::recompose(current.layout.root()).await?;

    let saved = match &current.target {
      SaveTarget::Remote(id) => {
        let saved = self.store.update(id, &doc).await?;
        info!(workflow_id = %id, "workflow saved to store");
        saved
      }
      SaveTarget::File(path) => {
        flowsplit_layout::write_document(&doc, path).await?;
        info!(path = %path.display(), "workflow saved to file");
        doc
      }
      SaveTarget::Unbound => return Err(SessionError::NoSaveTarget),
    };

    current.layout = flowsplit_layout::decompose(&saved, current.layout.root()).await?;
    current.files = (0..saved.nodes.len()).collect();
    self.view.load(saved.clone());
    Ok(saved)
  }

  /// Forget the open workflow. Its layout stays on disk.
  pub fn close(&mut self) {
    self.current = None;
    self.view.clear();
  }
}
