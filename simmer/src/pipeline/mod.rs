//! The recipe RAG pipeline: graph wiring and the invocation entrypoint.
//!
//! Topology (classify → retrieve → grade → web_search → generate, with
//! conditional branches):
//!
//! ```text
//! START → classify ──(relevance)──> retrieve | generate
//!         retrieve ──(retrieval)──> web_search | grade
//!         grade ─────(documents)──> web_search | generate
//!         web_search → generate
//!         generate → END
//! ```
//!
//! The retrieval branch realizes the empty-retrieval shortcut: an empty hit
//! set forces `web_search = yes` inside the retrieve node, and the retrieval
//! router then bypasses the grader entirely.

mod classify_node;
mod generate_node;
mod grade_node;
mod retrieve_node;
mod routers;
mod search_node;

pub use classify_node::ClassifyNode;
pub use generate_node::GenerateNode;
pub use grade_node::GradeNode;
pub use retrieve_node::RetrieveNode;
pub use routers::{
    documents_router, relevance_router, retrieval_router, GradeDecision, RelevanceDecision,
    RetrievalDecision,
};
pub use search_node::SearchNode;

use std::sync::Arc;

use crate::adapters::{Classifier, Generator, Grader, Retriever, SearchProvider};
use crate::error::PipelineError;
use crate::graph::{
    CompilationError, CompiledGraph, ConditionalEdge, RunConfig, StateGraph, TraceSink, END, START,
};
use crate::memory::Checkpointer;
use crate::state::RecipeState;

/// The five external collaborators, injected once at construction.
///
/// All are `Arc`s so one client can serve several capabilities (the OpenAI
/// chat client implements classifier, grader, and generator at once) and so
/// concurrent invocations share connections.
#[derive(Clone)]
pub struct Services {
    pub classifier: Arc<dyn Classifier>,
    pub retriever: Arc<dyn Retriever>,
    pub grader: Arc<dyn Grader>,
    pub search: Arc<dyn SearchProvider>,
    pub generator: Arc<dyn Generator>,
}

/// Declares and compiles the recipe graph over the given services.
pub fn build_graph(services: Services) -> Result<CompiledGraph<RecipeState>, CompilationError> {
    build_graph_with(services, |graph| graph)
}

fn build_graph_with(
    services: Services,
    configure: impl FnOnce(StateGraph<RecipeState>) -> StateGraph<RecipeState>,
) -> Result<CompiledGraph<RecipeState>, CompilationError> {
    let mut graph = configure(StateGraph::new());
    graph
        .add_node("classify", Arc::new(ClassifyNode::new(services.classifier)))
        .add_node("retrieve", Arc::new(RetrieveNode::new(services.retriever)))
        .add_node("grade", Arc::new(GradeNode::new(services.grader)))
        .add_node("web_search", Arc::new(SearchNode::new(services.search)))
        .add_node("generate", Arc::new(GenerateNode::new(services.generator)))
        .add_edge(START, "classify")
        .add_conditional_edges(
            "classify",
            ConditionalEdge::new(
                relevance_router,
                [
                    (RelevanceDecision::Retrieve, "retrieve"),
                    (RelevanceDecision::Generate, "generate"),
                ],
            ),
        )
        .add_conditional_edges(
            "retrieve",
            ConditionalEdge::new(
                retrieval_router,
                [
                    (RetrievalDecision::WebSearch, "web_search"),
                    (RetrievalDecision::Grade, "grade"),
                ],
            ),
        )
        .add_conditional_edges(
            "grade",
            ConditionalEdge::new(
                documents_router,
                [
                    (GradeDecision::WebSearch, "web_search"),
                    (GradeDecision::Generate, "generate"),
                ],
            ),
        )
        .add_edge("web_search", "generate")
        .add_edge("generate", END);
    graph.compile()
}

/// A compiled pipeline ready to answer questions.
///
/// Immutable after construction; share one instance (or clones of it) across
/// concurrent requests.
#[derive(Clone)]
pub struct Pipeline {
    graph: CompiledGraph<RecipeState>,
}

impl Pipeline {
    /// Compiles the standard graph with default options.
    pub fn new(services: Services) -> Result<Self, CompilationError> {
        Self::builder(services).build()
    }

    /// Builder for non-default step budget, trace sink, or checkpointer.
    pub fn builder(services: Services) -> PipelineBuilder {
        PipelineBuilder {
            services,
            max_steps: None,
            trace: None,
            checkpointer: None,
        }
    }

    /// Answers one question.
    ///
    /// Returns the generated answer text, or a typed error; an invocation that
    /// reaches END without a generation is [`PipelineError::NoGeneration`],
    /// never an empty success.
    pub async fn run(&self, question: &str, config: RunConfig) -> Result<String, PipelineError> {
        let state = RecipeState::new(question);
        let final_state = self.graph.invoke(state, config).await?;
        final_state.generation.ok_or(PipelineError::NoGeneration)
    }

    /// The underlying compiled graph, for introspection.
    pub fn graph(&self) -> &CompiledGraph<RecipeState> {
        &self.graph
    }
}

/// Options for [`Pipeline`] construction.
pub struct PipelineBuilder {
    services: Services,
    max_steps: Option<usize>,
    trace: Option<Arc<dyn TraceSink>>,
    checkpointer: Option<Arc<dyn Checkpointer<RecipeState>>>,
}

impl PipelineBuilder {
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn trace_sink(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.trace = Some(sink);
        self
    }

    pub fn checkpointer(mut self, checkpointer: Arc<dyn Checkpointer<RecipeState>>) -> Self {
        self.checkpointer = Some(checkpointer);
        self
    }

    pub fn build(self) -> Result<Pipeline, CompilationError> {
        let max_steps = self.max_steps;
        let trace = self.trace;
        let checkpointer = self.checkpointer;
        let graph = build_graph_with(self.services, move |mut graph| {
            if let Some(max_steps) = max_steps {
                graph = graph.with_max_steps(max_steps);
            }
            if let Some(trace) = trace {
                graph = graph.with_trace_sink(trace);
            }
            if let Some(checkpointer) = checkpointer {
                graph = graph.with_checkpointer(checkpointer);
            }
            graph
        })?;
        Ok(Pipeline { graph })
    }
}
