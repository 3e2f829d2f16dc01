//! Web-search node: replace the document set with search-derived context.

use std::sync::Arc;

use async_trait::async_trait;

use crate::adapters::SearchProvider;
use crate::error::AdapterError;
use crate::graph::Node;
use crate::state::{RecipeState, RecipeUpdate};

/// Replaces `documents` wholesale with search results.
///
/// Does not touch the `web_search` flag: a search that finds nothing leaves
/// the provenance trail intact. Fallback on search failure is an empty update,
/// so generation proceeds with whatever documents the state already holds.
pub struct SearchNode {
    search: Arc<dyn SearchProvider>,
}

impl SearchNode {
    pub fn new(search: Arc<dyn SearchProvider>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl Node<RecipeState> for SearchNode {
    fn id(&self) -> &str {
        "web_search"
    }

    async fn run(&self, state: &RecipeState) -> Result<RecipeUpdate, AdapterError> {
        let documents = self.search.search(&state.question).await?;
        tracing::debug!(passages = documents.len(), "web search complete");
        Ok(RecipeUpdate {
            documents: Some(documents),
            ..Default::default()
        })
    }

    fn fallback(&self) -> Option<RecipeUpdate> {
        Some(RecipeUpdate::default())
    }
}
