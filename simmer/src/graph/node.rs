//! Node trait: a named unit of work returning a partial state update.
//!
//! Nodes receive a read view of the state and return an update; they never
//! replace the whole record. The merge itself lives on [`PipelineState`] so
//! the executor stays generic over state shapes.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::AdapterError;

/// State threaded through a graph: cloneable, sendable, and mergeable.
///
/// `Update` is the partial-result type nodes return. `apply` overwrites
/// exactly the fields the update populates and must leave everything else
/// untouched; applying the same update twice must yield the same state
/// (no accumulation).
///
/// **Interaction**: Implemented by `RecipeState`; required by [`Node`],
/// `StateGraph`, and `CompiledGraph`.
pub trait PipelineState: Clone + Send + Sync + Debug + 'static {
    /// Partial update produced by one node run.
    type Update: Send + Sync + 'static;

    /// Merge `update` into `self` by key-wise overwrite.
    fn apply(&mut self, update: Self::Update);
}

/// One named step in the graph, possibly performing external I/O.
///
/// `run` gets a read view and returns a partial update; the executor applies
/// it and resolves the next node. When `run` fails, the executor consults
/// [`Node::fallback`]: `Some(update)` recovers the step with that declared
/// default, `None` propagates the failure as fatal for the invocation.
///
/// **Interaction**: Registered via `StateGraph::add_node`; driven by
/// `CompiledGraph::invoke`.
#[async_trait]
pub trait Node<S: PipelineState>: Send + Sync {
    /// Node id as registered in the graph (e.g. "retrieve").
    fn id(&self) -> &str;

    /// Execute the step against the current state and return a partial update.
    async fn run(&self, state: &S) -> Result<S::Update, AdapterError>;

    /// Declared default update applied when `run` fails. `None` (the default)
    /// propagates the failure instead.
    fn fallback(&self) -> Option<S::Update> {
        None
    }
}
