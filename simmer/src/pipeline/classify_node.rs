//! Classify node: decide whether the question is recipe territory at all.

use std::sync::Arc;

use async_trait::async_trait;

use crate::adapters::Classifier;
use crate::error::AdapterError;
use crate::graph::Node;
use crate::state::{Flag, RecipeState, RecipeUpdate};

/// First node of the graph; sets `recipe_relevant` exactly once.
///
/// Fallback on classifier failure is `yes`: a misclassified question costs one
/// retrieval round, whereas skipping grounding cannot be undone downstream.
pub struct ClassifyNode {
    classifier: Arc<dyn Classifier>,
}

impl ClassifyNode {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }
}

#[async_trait]
impl Node<RecipeState> for ClassifyNode {
    fn id(&self) -> &str {
        "classify"
    }

    async fn run(&self, state: &RecipeState) -> Result<RecipeUpdate, AdapterError> {
        let label = self.classifier.classify(&state.question).await?;
        tracing::debug!(label = ?label, "question relevance graded");
        Ok(RecipeUpdate {
            recipe_relevant: Some(label.into()),
            ..Default::default()
        })
    }

    fn fallback(&self) -> Option<RecipeUpdate> {
        Some(RecipeUpdate {
            recipe_relevant: Some(Flag::Yes),
            ..Default::default()
        })
    }
}
