//! Runtime error types for pipeline execution.
//!
//! Build-time graph problems are `CompilationError` (see `graph::state_graph`);
//! everything a running invocation can surface is here.

use thiserror::Error;

/// Failure of an external service call made by a node.
///
/// Nodes with a declared fallback update recover from this; nodes without one
/// surface it to the caller as [`PipelineError::Adapter`].
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Transport-level failure: connection refused, timeout, non-2xx status.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The service answered, but not in the shape the adapter requires
    /// (e.g. a binary grader that returned neither yes nor no).
    #[error("malformed adapter output: {0}")]
    MalformedOutput(String),
}

/// Error returned by a single pipeline invocation.
///
/// Fatal for the invocation only; other invocations sharing the same compiled
/// graph are unaffected.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A routing function produced a decision key absent from its table.
    /// Contract violation between router and table, not a data problem.
    #[error("node {node} routed on undeclared key {key:?} (valid keys: {expected:?})")]
    Routing {
        node: String,
        key: &'static str,
        expected: Vec<&'static str>,
    },

    /// Step budget exceeded; a misconfigured or cyclic graph, never truncated silently.
    #[error("step budget of {limit} exceeded")]
    MaxStepsExceeded { limit: usize },

    /// A node failed and declared no fallback update.
    #[error("node {node} failed")]
    Adapter {
        node: String,
        #[source]
        source: AdapterError,
    },

    /// Caller deadline expired; in-flight adapter calls are aborted.
    #[error("run cancelled by caller deadline")]
    Cancelled,

    /// The graph reached END without the terminal node writing a generation.
    #[error("pipeline reached END without a generation")]
    NoGeneration,
}
