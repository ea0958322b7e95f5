//! Flowsplit Session
//!
//! A [`Session`] is the handle for one editing session: which layout
//! directory is open, where saves go, and the node view that listings read
//! from. Each session is independent, so several workflows can be open at
//! once by holding several sessions.

mod error;
mod session;

pub use error::SessionError;
pub use session::{OpenWorkflow, SaveTarget, Session};
