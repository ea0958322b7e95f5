use std::sync::Arc;

use flowsplit_config::{Node, WorkflowDocument};
use tracing::debug;

use crate::events::{IndexEvent, IndexObserver};
use crate::grouping::GroupingIndex;

/// The loaded workflow together with its grouping index.
#[derive(Default)]
pub struct WorkflowView {
  document: Option<WorkflowDocument>,
  index: GroupingIndex,
  observers: Vec<Arc<dyn IndexObserver>>,
}

impl WorkflowView {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register an observer for future rebuilds.
  pub fn subscribe(&mut self, observer: Arc<dyn IndexObserver>) {
    self.observers.push(observer);
  }

  /// Replace the loaded document and rebuild the index.
  pub fn load(&mut self, doc: WorkflowDocument) {
    self.index = GroupingIndex::rebuild(&doc);
    debug!(
      workflow_id = ?doc.id,
      category_count = self.index.category_count(),
      "grouping index rebuilt"
    );

    let event = IndexEvent::Loaded {
      workflow_id: doc.id.clone(),
      category_count: self.index.category_count(),
      node_count: self.index.node_count(),
    };
    self.document = Some(doc);
    self.emit(event);
  }

  /// Replace the node at `index` and rebuild.
  ///
  /// Returns `false` without changing anything if there is no such node.
  pub fn update_one(&mut self, index: usize, node: Node) -> bool {
    let Some(doc) = self.document.as_mut() else {
      return false;
    };
    let Some(slot) = doc.nodes.get_mut(index) else {
      return false;
    };

    *slot = node;
    self.index = GroupingIndex::rebuild(doc);

    let event = IndexEvent::NodeUpdated {
      workflow_id: doc.id.clone(),
      node_index: index,
    };
    self.emit(event);
    true
  }

  /// Drop the loaded document.
  pub fn clear(&mut self) {
    self.document = None;
    self.index = GroupingIndex::default();
  }

  pub fn document(&self) -> Option<&WorkflowDocument> {
    self.document.as_ref()
  }

  pub fn index(&self) -> &GroupingIndex {
    &self.index
  }

  pub fn node(&self, index: usize) -> Option<&Node> {
    self.document.as_ref()?.nodes.get(index)
  }

  fn emit(&self, event: IndexEvent) {
    for observer in &self.observers {
      observer.notify(event.clone());
    }
  }
}
