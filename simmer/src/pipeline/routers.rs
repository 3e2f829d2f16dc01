//! Routing functions and their decision enums for the recipe graph.
//!
//! Each router inspects post-merge state and returns a closed decision; the
//! graph wiring in `pipeline::build_graph` maps decisions to target nodes.

use crate::graph::Decision;
use crate::state::{Flag, RecipeState};

/// After classify: pursue retrieval, or answer ungrounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelevanceDecision {
    Retrieve,
    Generate,
}

impl Decision for RelevanceDecision {
    const ALL: &'static [Self] = &[RelevanceDecision::Retrieve, RelevanceDecision::Generate];

    fn key(&self) -> &'static str {
        match self {
            RelevanceDecision::Retrieve => "retrieve",
            RelevanceDecision::Generate => "generate",
        }
    }
}

/// After retrieve: grade what came back, or jump straight to web search when
/// retrieval already forced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalDecision {
    WebSearch,
    Grade,
}

impl Decision for RetrievalDecision {
    const ALL: &'static [Self] = &[RetrievalDecision::WebSearch, RetrievalDecision::Grade];

    fn key(&self) -> &'static str {
        match self {
            RetrievalDecision::WebSearch => "web_search",
            RetrievalDecision::Grade => "grade",
        }
    }
}

/// After grade: search the web, or generate from the graded documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeDecision {
    WebSearch,
    Generate,
}

impl Decision for GradeDecision {
    const ALL: &'static [Self] = &[GradeDecision::WebSearch, GradeDecision::Generate];

    fn key(&self) -> &'static str {
        match self {
            GradeDecision::WebSearch => "web_search",
            GradeDecision::Generate => "generate",
        }
    }
}

/// Retrieve when the question is recipe-related, otherwise answer directly.
pub fn relevance_router(state: &RecipeState) -> RelevanceDecision {
    if state.recipe_relevant == Flag::Yes {
        RelevanceDecision::Retrieve
    } else {
        RelevanceDecision::Generate
    }
}

/// Honor a web-search flag forced by empty retrieval; otherwise grade.
pub fn retrieval_router(state: &RecipeState) -> RetrievalDecision {
    if state.web_search == Flag::Yes {
        RetrievalDecision::WebSearch
    } else {
        RetrievalDecision::Grade
    }
}

/// The web-search flag is evaluated first; only a cleared flag generates.
pub fn documents_router(state: &RecipeState) -> GradeDecision {
    if state.web_search == Flag::Yes {
        GradeDecision::WebSearch
    } else {
        GradeDecision::Generate
    }
}
