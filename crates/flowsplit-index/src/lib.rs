//! Flowsplit Index
//!
//! Groups the nodes of the loaded workflow by category, the last segment of
//! the node type (`n8n-nodes-base.httpRequest` -> `httpRequest`). The index
//! is rebuilt in full whenever the document changes; observers only ever see
//! a complete index.

mod events;
mod grouping;
mod view;

pub use events::{ChannelObserver, IndexEvent, IndexObserver, NoopObserver};
pub use grouping::{GroupingIndex, NodeSummary, category_of};
pub use view::WorkflowView;
