//! Logging helpers for graph execution lifecycle events.
//!
//! Per-node detail goes through the trace sink; these cover the run as a whole.

use crate::error::PipelineError;

/// Log invocation start.
pub fn log_graph_start(entry: &str) {
    tracing::info!(entry = %entry, "starting graph execution");
}

/// Log a node about to run.
pub fn log_node_start(node_id: &str, step: usize) {
    tracing::debug!(node_id = %node_id, step = step, "running node");
}

/// Log invocation completion.
pub fn log_graph_complete(steps: usize) {
    tracing::info!(steps = steps, "graph execution complete");
}

/// Log invocation failure.
pub fn log_graph_error(error: &PipelineError) {
    tracing::error!(?error, "graph execution error");
}
