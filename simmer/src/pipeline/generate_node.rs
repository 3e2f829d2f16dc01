//! Generate node: produce the final answer from context and provenance.

use std::sync::Arc;

use async_trait::async_trait;

use crate::adapters::{Generator, Provenance};
use crate::error::AdapterError;
use crate::graph::Node;
use crate::state::{RecipeState, RecipeUpdate};

/// Terminal step; the only writer of `generation`.
///
/// No fallback: there is no safe default answer, so a generator failure
/// aborts the invocation.
pub struct GenerateNode {
    generator: Arc<dyn Generator>,
}

impl GenerateNode {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Node<RecipeState> for GenerateNode {
    fn id(&self) -> &str {
        "generate"
    }

    async fn run(&self, state: &RecipeState) -> Result<RecipeUpdate, AdapterError> {
        let provenance = Provenance {
            recipe_relevant: state.recipe_relevant,
            documents_relevant: state.documents_relevant,
            web_search: state.web_search,
        };
        let generation = self
            .generator
            .generate(&state.question, &state.documents, provenance)
            .await?;
        Ok(RecipeUpdate {
            generation: Some(generation),
            ..Default::default()
        })
    }
}
