//! Conditional state-graph executor: builder, compiler, run loop.
//!
//! A graph is declared on [`StateGraph`] (nodes, static edges, conditional
//! edges with closed decision tables), validated by `compile()`, and executed
//! by [`CompiledGraph::invoke`]. Nodes return partial updates that the run
//! loop merges into the state by key-wise overwrite.

mod compiled;
mod conditional;
mod logging;
mod node;
mod state_graph;
mod trace;

pub use compiled::{CompiledGraph, RunConfig};
pub use conditional::{ConditionalEdge, Decision, NextEntry};
pub use node::{Node, PipelineState};
pub use state_graph::{CompilationError, StateGraph, END, START};
pub use trace::{RecordingSink, TraceEvent, TraceOutcome, TraceSink, TracingSink};
