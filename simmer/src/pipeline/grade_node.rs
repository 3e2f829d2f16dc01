//! Grade node: judge whether the retrieved passages answer the question.

use std::sync::Arc;

use async_trait::async_trait;

use crate::adapters::{Grader, Label};
use crate::error::AdapterError;
use crate::graph::Node;
use crate::state::{Flag, RecipeState, RecipeUpdate};

/// Sets `documents_relevant` exactly once and flips `web_search` accordingly.
///
/// Fallback on grader failure mirrors the reject branch
/// (`web_search = yes`): when in doubt, ground through search rather than
/// trust ungraded passages.
pub struct GradeNode {
    grader: Arc<dyn Grader>,
}

impl GradeNode {
    pub fn new(grader: Arc<dyn Grader>) -> Self {
        Self { grader }
    }
}

#[async_trait]
impl Node<RecipeState> for GradeNode {
    fn id(&self) -> &str {
        "grade"
    }

    async fn run(&self, state: &RecipeState) -> Result<RecipeUpdate, AdapterError> {
        let label = self
            .grader
            .grade(&state.question, &state.documents)
            .await?;
        tracing::debug!(label = ?label, "documents graded");
        let update = match label {
            Label::Yes => RecipeUpdate {
                documents_relevant: Some(Flag::Yes),
                web_search: Some(Flag::No),
                ..Default::default()
            },
            Label::No => RecipeUpdate {
                documents_relevant: Some(Flag::No),
                web_search: Some(Flag::Yes),
                ..Default::default()
            },
        };
        Ok(update)
    }

    fn fallback(&self) -> Option<RecipeUpdate> {
        Some(RecipeUpdate {
            documents_relevant: Some(Flag::No),
            web_search: Some(Flag::Yes),
            ..Default::default()
        })
    }
}
