//! Compiled graph: immutable, validated, supports invoke only.
//!
//! Built by `StateGraph::compile`. The run loop drives node execution from the
//! START target to END, merging each node's partial update into the state,
//! resolving the next node through static or conditional routes, and enforcing
//! the step budget and caller deadline at every node boundary.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::PipelineError;
use crate::memory::Checkpointer;

use super::conditional::NextEntry;
use super::logging::{log_graph_complete, log_graph_error, log_graph_start, log_node_start};
use super::node::{Node, PipelineState};
use super::state_graph::END;
use super::trace::{TraceEvent, TraceOutcome, TraceSink};

/// Per-invocation options.
///
/// `session_id` keys best-effort checkpoints when the graph was compiled with
/// a checkpointer. `deadline` bounds the whole invocation; it is checked
/// before each node and aborts an in-flight step, yielding
/// [`PipelineError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub session_id: Option<String>,
    pub deadline: Option<Duration>,
}

/// Immutable compiled graph, safe to share across concurrent invocations.
///
/// Each invocation owns its state exclusively; the only shared pieces are the
/// node implementations (behind `Arc`, required `Send + Sync`) and this
/// structure itself.
#[derive(Clone)]
pub struct CompiledGraph<S: PipelineState> {
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    /// Node targeted by the START edge.
    pub(super) entry: String,
    /// Outgoing route per node: static target or conditional edge.
    pub(super) next_map: HashMap<String, NextEntry<S>>,
    pub(super) max_steps: usize,
    pub(super) trace: Arc<dyn TraceSink>,
    pub(super) checkpointer: Option<Arc<dyn Checkpointer<S>>>,
}

impl<S: PipelineState> std::fmt::Debug for CompiledGraph<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledGraph")
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .field("entry", &self.entry)
            .field("max_steps", &self.max_steps)
            .field("has_checkpointer", &self.checkpointer.is_some())
            .finish()
    }
}

impl<S: PipelineState> CompiledGraph<S> {
    /// Runs the graph to END and returns the final state.
    ///
    /// Fatal conditions: a node failing without a fallback, a routing miss,
    /// the step budget, and the caller deadline. Each aborts this invocation
    /// only.
    pub async fn invoke(&self, state: S, config: RunConfig) -> Result<S, PipelineError> {
        let result = self.run_loop(state, &config).await;
        if let Err(ref error) = result {
            log_graph_error(error);
        }
        result
    }

    async fn run_loop(&self, mut state: S, config: &RunConfig) -> Result<S, PipelineError> {
        log_graph_start(&self.entry);
        let deadline = config.deadline.map(|d| Instant::now() + d);
        let mut current = self.entry.clone();
        let mut steps = 0usize;

        loop {
            if current == END {
                log_graph_complete(steps);
                return Ok(state);
            }
            if steps >= self.max_steps {
                return Err(PipelineError::MaxStepsExceeded {
                    limit: self.max_steps,
                });
            }
            if deadline.is_some_and(|at| Instant::now() >= at) {
                return Err(PipelineError::Cancelled);
            }

            // Both lookups hold for any graph that passed compile().
            let node = self
                .nodes
                .get(&current)
                .expect("compiled graph has all nodes")
                .clone();
            log_node_start(&current, steps);

            let started = Instant::now();
            let result = match deadline {
                Some(at) => match tokio::time::timeout_at(at, node.run(&state)).await {
                    Ok(result) => result,
                    Err(_) => return Err(PipelineError::Cancelled),
                },
                None => node.run(&state).await,
            };
            let duration = started.elapsed();

            let (update, outcome) = match result {
                Ok(update) => (update, TraceOutcome::Success),
                Err(error) => match node.fallback() {
                    Some(update) => {
                        tracing::warn!(node = %current, %error, "step failed, applying fallback");
                        (update, TraceOutcome::Recovered)
                    }
                    None => {
                        self.trace.record(TraceEvent {
                            node: current.clone(),
                            decision: None,
                            outcome: TraceOutcome::Failed,
                            duration,
                        });
                        return Err(PipelineError::Adapter {
                            node: current,
                            source: error,
                        });
                    }
                },
            };

            state.apply(update);

            if let (Some(checkpointer), Some(session_id)) =
                (&self.checkpointer, &config.session_id)
            {
                // Best-effort resumability; a failed save never fails the run.
                if let Err(error) = checkpointer.save(session_id, &state).await {
                    tracing::warn!(session_id = %session_id, %error, "checkpoint save failed");
                }
            }

            let (next, decision) = match self
                .next_map
                .get(&current)
                .expect("compiled graph has a route per node")
            {
                NextEntry::Static(to) => (to.clone(), None),
                NextEntry::Conditional(edge) => {
                    let key = edge.decide(&state);
                    let target =
                        edge.target_for(key)
                            .ok_or_else(|| PipelineError::Routing {
                                node: current.clone(),
                                key,
                                expected: edge.declared_keys(),
                            })?;
                    tracing::debug!(from = %current, decision = %key, to = %target, "conditional routing");
                    (target.to_string(), Some(key))
                }
            };

            self.trace.record(TraceEvent {
                node: current,
                decision,
                outcome,
                duration,
            });

            steps += 1;
            current = next;
        }
    }

    /// Registered node ids, sorted.
    pub fn node_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Static target of `node`, when it routes unconditionally.
    pub fn static_target(&self, node: &str) -> Option<&str> {
        match self.next_map.get(node) {
            Some(NextEntry::Static(to)) => Some(to.as_str()),
            _ => None,
        }
    }

    /// Decision table of `node` as (key, target) pairs, when it routes
    /// conditionally. Sorted by key for stable assertions.
    pub fn decision_targets(&self, node: &str) -> Option<Vec<(&'static str, &str)>> {
        match self.next_map.get(node) {
            Some(NextEntry::Conditional(edge)) => {
                let mut targets: Vec<(&'static str, &str)> = edge
                    .table
                    .iter()
                    .map(|(key, target)| (*key, target.as_str()))
                    .collect();
                targets.sort_unstable_by_key(|(key, _)| *key);
                Some(targets)
            }
            _ => None,
        }
    }
}
