//! Adapter capability traits consumed by the pipeline nodes.
//!
//! Every external collaborator (classifier, retriever, grader, web search,
//! generator) is injected behind one of these traits. Implementations must
//! be safe for concurrent calls; nodes hold them as `Arc<dyn Trait>` shared
//! across simultaneous invocations.

mod chroma;
pub mod mock;
mod openai;
mod tavily;

pub use chroma::ChromaRetriever;
pub use openai::{OpenAiChat, OpenAiEmbedder};
pub use tavily::TavilySearch;

use async_trait::async_trait;

use crate::error::AdapterError;
use crate::state::{DocumentSet, Flag};

/// Binary verdict produced by the classifier and the grader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Yes,
    No,
}

impl From<Label> for Flag {
    fn from(label: Label) -> Self {
        match label {
            Label::Yes => Flag::Yes,
            Label::No => Flag::No,
        }
    }
}

/// Provenance flags handed to the generator so it can attribute the answer.
#[derive(Debug, Clone, Copy)]
pub struct Provenance {
    pub recipe_relevant: Flag,
    pub documents_relevant: Flag,
    pub web_search: Flag,
}

/// Decides whether a question is about food/recipes at all.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, question: &str) -> Result<Label, AdapterError>;
}

/// Fetches candidate passages for a question. May return an empty set.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, question: &str) -> Result<DocumentSet, AdapterError>;
}

/// Decides whether retrieved passages can answer the question.
#[async_trait]
pub trait Grader: Send + Sync {
    async fn grade(&self, question: &str, documents: &DocumentSet)
        -> Result<Label, AdapterError>;
}

/// Web search fallback when local retrieval cannot ground the answer.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<DocumentSet, AdapterError>;
}

/// Produces the final answer from question, context, and provenance flags.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(
        &self,
        question: &str,
        context: &DocumentSet,
        provenance: Provenance,
    ) -> Result<String, AdapterError>;
}

/// Turns text into a query vector for the retriever.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AdapterError>;
}
