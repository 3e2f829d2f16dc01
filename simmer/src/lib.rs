//! Simmer: grounded recipe answers from a conditional RAG state graph.
//!
//! The crate is split into the generic state-graph executor (`graph`), the
//! pipeline state threaded through it (`state`), the five RAG nodes and their
//! routers (`pipeline`), adapter capability traits plus concrete clients
//! (`adapters`), and the optional session checkpointer (`memory`).
//!
//! Typical use: build a [`Services`] bundle (real clients or mocks), compile a
//! [`Pipeline`], then call [`Pipeline::run`] per question. The compiled graph
//! is immutable and cheap to clone, so one instance serves concurrent requests.

pub mod adapters;
pub mod error;
pub mod graph;
pub mod memory;
pub mod pipeline;
pub mod state;

pub use error::{AdapterError, PipelineError};
pub use graph::{
    CompilationError, CompiledGraph, ConditionalEdge, Decision, Node, PipelineState, RunConfig,
    StateGraph, TraceEvent, TraceOutcome, TraceSink, END, START,
};
pub use pipeline::{Pipeline, PipelineBuilder, Services};
pub use state::{Document, DocumentSet, Flag, RecipeState, RecipeUpdate};
