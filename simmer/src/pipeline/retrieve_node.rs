//! Retrieve node: fetch candidate passages from the vector store.

use std::sync::Arc;

use async_trait::async_trait;

use crate::adapters::Retriever;
use crate::error::AdapterError;
use crate::graph::Node;
use crate::state::{DocumentSet, Flag, RecipeState, RecipeUpdate};

/// Fetches passages for the question and primes the web-search flag.
///
/// Empty retrieval forces `web_search = yes` directly and leaves
/// `documents_relevant` unset, so the retrieval router skips the grader
/// entirely. Fallback on retriever failure takes the same shortcut.
pub struct RetrieveNode {
    retriever: Arc<dyn Retriever>,
}

impl RetrieveNode {
    pub fn new(retriever: Arc<dyn Retriever>) -> Self {
        Self { retriever }
    }
}

#[async_trait]
impl Node<RecipeState> for RetrieveNode {
    fn id(&self) -> &str {
        "retrieve"
    }

    async fn run(&self, state: &RecipeState) -> Result<RecipeUpdate, AdapterError> {
        let documents = self.retriever.retrieve(&state.question).await?;
        if documents.is_empty() {
            tracing::debug!("retrieval empty, forcing web search");
            return Ok(RecipeUpdate {
                documents: Some(DocumentSet::Empty),
                web_search: Some(Flag::Yes),
                ..Default::default()
            });
        }
        tracing::debug!(passages = documents.len(), "retrieval hit");
        Ok(RecipeUpdate {
            documents: Some(documents),
            web_search: Some(Flag::No),
            ..Default::default()
        })
    }

    fn fallback(&self) -> Option<RecipeUpdate> {
        Some(RecipeUpdate {
            documents: Some(DocumentSet::Empty),
            web_search: Some(Flag::Yes),
            ..Default::default()
        })
    }
}
