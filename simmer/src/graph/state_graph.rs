//! Graph builder and compiler: declare nodes and edges, validate, produce a
//! `CompiledGraph`.
//!
//! All structural checks happen in `compile()`; a graph that compiles cannot
//! fail structurally at run time (routing misses excepted, which are a
//! router/table contract violation, not a structure problem).

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use thiserror::Error;

use crate::memory::Checkpointer;

use super::compiled::CompiledGraph;
use super::conditional::{ConditionalEdge, NextEntry};
use super::node::{Node, PipelineState};
use super::trace::{TraceSink, TracingSink};

/// Pseudo-node marking the entry edge of a graph.
pub const START: &str = "__start__";
/// Pseudo-node marking termination; has no outgoing edges.
pub const END: &str = "__end__";

/// Default step budget. Generous for a linear-with-branches graph; a run that
/// hits it has a cycle or a misconfigured route.
const DEFAULT_MAX_STEPS: usize = 16;

/// Structural problem in a graph definition, found by `compile()`.
///
/// Build-time only: raised before any execution, never mid-run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompilationError {
    /// No edge leaves START.
    #[error("graph has no START edge")]
    MissingStart,

    /// More than one edge leaves START.
    #[error("graph has more than one START edge")]
    MultipleStart,

    /// The same node id was registered twice.
    #[error("duplicate node id {node:?}")]
    DuplicateNode { node: String },

    /// An edge leaves a node that was never registered.
    #[error("edge source {from:?} is not a registered node")]
    UnknownSource { from: String },

    /// An edge (static or conditional) targets a node that was never registered.
    #[error("edge {from:?} -> {to:?} targets an unregistered node")]
    UnknownTarget { from: String, to: String },

    /// END must be terminal.
    #[error("END must not have outgoing edges (found END -> {to:?})")]
    EdgeFromEnd { to: String },

    /// A node has more than one outgoing route (two static edges, or a static
    /// edge next to conditional edges).
    #[error("node {node:?} has conflicting outgoing routes")]
    ConflictingRoutes { node: String },

    /// A node has no outgoing route at all; execution could never leave it.
    #[error("node {node:?} has no outgoing edge")]
    NoOutgoing { node: String },

    /// Conditional edges declared with an empty decision table.
    #[error("conditional edges on {node:?} have an empty decision table")]
    EmptyDecisionTable { node: String },

    /// The decision table does not cover every variant of the routing enum.
    #[error("decision table on {node:?} is missing keys {missing:?}")]
    IncompleteDecisionTable {
        node: String,
        missing: Vec<&'static str>,
    },

    /// A registered node cannot be reached from START.
    #[error("node {node:?} is not reachable from START")]
    Unreachable { node: String },
}

/// Mutable graph definition: nodes, static edges, conditional edges.
///
/// Built once at startup, then `compile()`d into an immutable
/// [`CompiledGraph`] that is safe to share across concurrent invocations.
pub struct StateGraph<S: PipelineState> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    /// First id registered twice, reported by compile.
    duplicate: Option<String>,
    edges: Vec<(String, String)>,
    conditional: HashMap<String, ConditionalEdge<S>>,
    max_steps: usize,
    trace: Arc<dyn TraceSink>,
    checkpointer: Option<Arc<dyn Checkpointer<S>>>,
}

impl<S: PipelineState> StateGraph<S> {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            duplicate: None,
            edges: Vec::new(),
            conditional: HashMap::new(),
            max_steps: DEFAULT_MAX_STEPS,
            trace: Arc::new(TracingSink),
            checkpointer: None,
        }
    }

    /// Replaces the step budget enforced by the run loop.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Replaces the trace sink receiving per-node execution events.
    pub fn with_trace_sink(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.trace = sink;
        self
    }

    /// Sets a checkpointer; state is saved best-effort after every merge when
    /// the invocation carries a session id.
    pub fn with_checkpointer(mut self, checkpointer: Arc<dyn Checkpointer<S>>) -> Self {
        self.checkpointer = Some(checkpointer);
        self
    }

    /// Registers a node under `id`. Duplicate ids are reported at compile time.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node<S>>) -> &mut Self {
        let id = id.into();
        if self.nodes.contains_key(&id) && self.duplicate.is_none() {
            self.duplicate = Some(id.clone());
        }
        self.nodes.insert(id, node);
        self
    }

    /// Adds a static edge `from -> to`. Use [`START`] and [`END`] for the
    /// entry edge and termination.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.edges.push((from.into(), to.into()));
        self
    }

    /// Adds conditional edges out of `from`, resolved through the edge's
    /// decision table after the node runs.
    pub fn add_conditional_edges(
        &mut self,
        from: impl Into<String>,
        edge: ConditionalEdge<S>,
    ) -> &mut Self {
        self.conditional.insert(from.into(), edge);
        self
    }

    /// Validates the definition and produces an immutable [`CompiledGraph`].
    ///
    /// Checks: single START edge with a registered target; all edge endpoints
    /// registered (or END as target); END terminal; decision tables non-empty
    /// and complete over their routing enum; every node with exactly one
    /// outgoing route; every node reachable from START.
    pub fn compile(self) -> Result<CompiledGraph<S>, CompilationError> {
        if let Some(node) = self.duplicate {
            return Err(CompilationError::DuplicateNode { node });
        }

        let mut start_targets = self.edges.iter().filter(|(from, _)| from == START);
        let entry = match (start_targets.next(), start_targets.next()) {
            (None, _) => return Err(CompilationError::MissingStart),
            (Some(_), Some(_)) => return Err(CompilationError::MultipleStart),
            (Some((_, to)), None) => to.clone(),
        };
        if !self.nodes.contains_key(&entry) {
            return Err(CompilationError::UnknownTarget {
                from: START.to_string(),
                to: entry,
            });
        }

        let mut next_map: HashMap<String, NextEntry<S>> = HashMap::new();

        for (from, to) in &self.edges {
            if from == START {
                continue;
            }
            if from == END {
                return Err(CompilationError::EdgeFromEnd { to: to.clone() });
            }
            if !self.nodes.contains_key(from) {
                return Err(CompilationError::UnknownSource { from: from.clone() });
            }
            if to != END && !self.nodes.contains_key(to) {
                return Err(CompilationError::UnknownTarget {
                    from: from.clone(),
                    to: to.clone(),
                });
            }
            if self.conditional.contains_key(from)
                || next_map.insert(from.clone(), NextEntry::Static(to.clone())).is_some()
            {
                return Err(CompilationError::ConflictingRoutes { node: from.clone() });
            }
        }

        for (from, edge) in self.conditional {
            if from == START || from == END || !self.nodes.contains_key(&from) {
                return Err(CompilationError::UnknownSource { from });
            }
            if edge.table.is_empty() {
                return Err(CompilationError::EmptyDecisionTable { node: from });
            }
            if !edge.missing.is_empty() {
                return Err(CompilationError::IncompleteDecisionTable {
                    node: from,
                    missing: edge.missing,
                });
            }
            for target in edge.targets() {
                if target != END && !self.nodes.contains_key(target) {
                    return Err(CompilationError::UnknownTarget {
                        from: from.clone(),
                        to: target.to_string(),
                    });
                }
            }
            if next_map.insert(from.clone(), NextEntry::Conditional(edge)).is_some() {
                return Err(CompilationError::ConflictingRoutes { node: from });
            }
        }

        for id in self.nodes.keys() {
            if !next_map.contains_key(id) {
                return Err(CompilationError::NoOutgoing { node: id.clone() });
            }
        }

        // Reachability from the entry node over both edge kinds.
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        visited.insert(entry.as_str());
        queue.push_back(entry.as_str());
        while let Some(current) = queue.pop_front() {
            let targets: Vec<&str> = match next_map.get(current) {
                Some(NextEntry::Static(to)) => vec![to.as_str()],
                Some(NextEntry::Conditional(edge)) => edge.targets().collect(),
                None => vec![],
            };
            for to in targets {
                if to != END && visited.insert(to) {
                    queue.push_back(to);
                }
            }
        }
        if let Some(node) = self
            .nodes
            .keys()
            .find(|id| !visited.contains(id.as_str()))
        {
            return Err(CompilationError::Unreachable { node: node.clone() });
        }

        Ok(CompiledGraph {
            nodes: self.nodes,
            entry,
            next_map,
            max_steps: self.max_steps,
            trace: self.trace,
            checkpointer: self.checkpointer,
        })
    }
}

impl<S: PipelineState> Default for StateGraph<S> {
    fn default() -> Self {
        Self::new()
    }
}
