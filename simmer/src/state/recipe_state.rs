//! Recipe pipeline state: the record nodes read and partially update.
//!
//! `RecipeState` is created once per invocation from the caller's question and
//! mutated only by the run loop applying `RecipeUpdate`s. The question is not
//! representable in an update, so it cannot change after construction.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::graph::PipelineState;

/// Three-valued flag for the classification and grading outcomes.
///
/// `Unset` is the freshly-initialized value; classifier and grader each set
/// their flag exactly once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Flag {
    Yes,
    No,
    #[default]
    Unset,
}

impl Flag {
    pub fn is_yes(self) -> bool {
        self == Flag::Yes
    }
}

/// One retrieved passage with its metadata (source path, title, score, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Zero, one, or many retrieved passages.
///
/// A closed variant instead of an untyped "string or list" value: every
/// consumer matches the three shapes explicitly, and the only conversion to
/// plain text is [`DocumentSet::as_text`], used at the generation boundary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum DocumentSet {
    #[default]
    Empty,
    Single(String),
    Many(Vec<Document>),
}

impl DocumentSet {
    /// True when there is no usable passage content at all.
    pub fn is_empty(&self) -> bool {
        match self {
            DocumentSet::Empty => true,
            DocumentSet::Single(text) => text.trim().is_empty(),
            DocumentSet::Many(docs) => docs.is_empty(),
        }
    }

    /// Number of passages held.
    pub fn len(&self) -> usize {
        match self {
            DocumentSet::Empty => 0,
            DocumentSet::Single(text) => usize::from(!text.trim().is_empty()),
            DocumentSet::Many(docs) => docs.len(),
        }
    }

    /// Total conversion to plain text: passages joined by blank lines.
    ///
    /// The only place document shape is erased; used when building the
    /// generation context.
    pub fn as_text(&self) -> String {
        match self {
            DocumentSet::Empty => String::new(),
            DocumentSet::Single(text) => text.clone(),
            DocumentSet::Many(docs) => docs
                .iter()
                .map(|doc| doc.content.as_str())
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }
}

/// State record for one pipeline invocation.
///
/// Exactly one writer at a time (the run loop); shared adapters never see a
/// mutable reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeState {
    /// The caller's question; immutable once set.
    pub question: String,
    /// Final answer; written only by the generate node.
    pub generation: Option<String>,
    /// Retrieved or searched passages; replaced wholesale, never appended.
    pub documents: DocumentSet,
    /// Classifier outcome: is this a food/recipe question at all.
    pub recipe_relevant: Flag,
    /// Grader outcome: do the retrieved passages answer the question.
    pub documents_relevant: Flag,
    /// Whether the web-search branch should run; set by the grader, or by the
    /// retrieve node directly when retrieval comes back empty.
    pub web_search: Flag,
}

impl RecipeState {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            generation: None,
            documents: DocumentSet::Empty,
            recipe_relevant: Flag::Unset,
            documents_relevant: Flag::Unset,
            web_search: Flag::Unset,
        }
    }
}

/// Partial update returned by one node run.
///
/// Populated fields overwrite the state field wholesale; `None` fields leave
/// the state untouched. There is intentionally no `question` field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeUpdate {
    pub generation: Option<String>,
    pub documents: Option<DocumentSet>,
    pub recipe_relevant: Option<Flag>,
    pub documents_relevant: Option<Flag>,
    pub web_search: Option<Flag>,
}

impl PipelineState for RecipeState {
    type Update = RecipeUpdate;

    fn apply(&mut self, update: RecipeUpdate) {
        if let Some(generation) = update.generation {
            self.generation = Some(generation);
        }
        if let Some(documents) = update.documents {
            self.documents = documents;
        }
        if let Some(flag) = update.recipe_relevant {
            self.recipe_relevant = flag;
        }
        if let Some(flag) = update.documents_relevant {
            self.documents_relevant = flag;
        }
        if let Some(flag) = update.web_search {
            self.web_search = flag;
        }
    }
}
