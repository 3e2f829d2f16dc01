//! In-memory checkpointer. Not persistent; for dev and tests.

use async_trait::async_trait;
use dashmap::DashMap;

use super::checkpoint::{CheckpointError, Checkpointer};

/// In-memory checkpointer keeping the latest state per session id.
///
/// Concurrent saves from independent invocations are fine; each session has
/// one writer at a time because a session id belongs to one invocation.
///
/// **Interaction**: Used as `Arc<dyn Checkpointer<S>>` in
/// `StateGraph::with_checkpointer`.
pub struct MemorySaver<S> {
    by_session: DashMap<String, S>,
}

impl<S> MemorySaver<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            by_session: DashMap::new(),
        }
    }
}

impl<S> Default for MemorySaver<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<S> Checkpointer<S> for MemorySaver<S>
where
    S: Clone + Send + Sync + 'static,
{
    async fn save(&self, session_id: &str, state: &S) -> Result<(), CheckpointError> {
        self.by_session.insert(session_id.to_string(), state.clone());
        Ok(())
    }

    async fn load(&self, session_id: &str) -> Result<Option<S>, CheckpointError> {
        Ok(self
            .by_session
            .get(session_id)
            .map(|entry| entry.value().clone()))
    }
}
