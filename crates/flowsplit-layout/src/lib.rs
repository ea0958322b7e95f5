//! Flowsplit Layout
//!
//! Splits a workflow document into an editable directory and puts it back
//! together again:
//!
//! ```text
//! {workflow_dir}/
//! ├── workflow.json                     (manifest, full document)
//! └── nodes/
//!     ├── 0_Webhook.json
//!     ├── 1_Transform.json
//!     ├── 1_Transform.js                (code sidecar, after `open_node`)
//!     └── 1_Transform_README.txt
//! ```
//!
//! The number in front of each node file is the node's position in the
//! document and the only thing used to order nodes on reassembly. Removing a
//! node file removes the node.

pub mod code;
pub mod codec;
mod decompose;
mod document;
mod error;
mod layout;
mod recompose;
mod sidecar;

pub use decompose::decompose;
pub use document::{document_from_value, read_document, write_document};
pub use error::LayoutError;
pub use layout::{Layout, MANIFEST_FILE, NODES_DIR, NodeFile, README_SUFFIX, SIDECAR_EXTENSION};
pub use recompose::recompose;
pub use sidecar::{OpenedNode, Sidecar, open_node, write_node};
