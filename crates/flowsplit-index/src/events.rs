//! Notifications about index rebuilds.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Events emitted by a [`WorkflowView`](crate::WorkflowView).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexEvent {
  /// A new document was loaded.
  Loaded {
    workflow_id: Option<String>,
    category_count: usize,
    node_count: usize,
  },

  /// One node was replaced and the index rebuilt.
  NodeUpdated {
    workflow_id: Option<String>,
    node_index: usize,
  },
}

/// Receives events after the index has been fully rebuilt.
pub trait IndexObserver: Send + Sync {
  fn notify(&self, event: IndexEvent);
}

/// Discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopObserver;

impl IndexObserver for NoopObserver {
  fn notify(&self, _event: IndexEvent) {}
}

/// Forwards events to an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
  sender: mpsc::UnboundedSender<IndexEvent>,
}

impl ChannelObserver {
  pub fn new(sender: mpsc::UnboundedSender<IndexEvent>) -> Self {
    Self { sender }
  }
}

impl IndexObserver for ChannelObserver {
  fn notify(&self, event: IndexEvent) {
    // Receiver may have been dropped
    let _ = self.sender.send(event);
  }
}
