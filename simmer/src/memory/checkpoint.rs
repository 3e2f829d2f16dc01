//! Checkpointer trait: save/load state keyed by a caller-supplied session id.
//!
//! Resumability only, not durability: the run loop saves best-effort after
//! every merge and ignores save failures beyond a warning. A pipeline without
//! a checkpointer behaves identically for a single run.

use async_trait::async_trait;
use thiserror::Error;

/// Checkpoint storage failure.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("checkpoint storage failure: {0}")]
    Storage(String),
}

/// Stores the latest state per session.
///
/// **Interaction**: Set via `StateGraph::with_checkpointer`; `save` is called
/// by the run loop after each merge when the invocation has a session id,
/// `load` by callers that want to inspect or resume a session.
#[async_trait]
pub trait Checkpointer<S>: Send + Sync {
    async fn save(&self, session_id: &str, state: &S) -> Result<(), CheckpointError>;

    async fn load(&self, session_id: &str) -> Result<Option<S>, CheckpointError>;
}
