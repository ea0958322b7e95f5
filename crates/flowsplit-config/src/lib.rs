//! Flowsplit Config
//!
//! This crate contains the serializable workflow document types shared by the
//! rest of the workspace. A document has the same shape the n8n workflow store
//! returns: an ordered list of typed nodes plus a name-keyed connection graph.
//!
//! Documents can come from:
//! - JSON files on disk (via the CLI `split` command)
//! - The remote workflow store (via `pull`)
//! - A decomposed layout that is being reassembled
//!
//! Fields the types do not model are kept in `extra` maps so that a document
//! survives a load/save cycle unchanged.

mod connection;
mod node;
mod workflow;

pub use connection::{ConnectionGraph, ConnectionTarget, OutputPorts};
pub use node::{Node, Position};
pub use workflow::WorkflowDocument;
