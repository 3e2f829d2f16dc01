//! Mock adapters for tests and examples.
//!
//! Deterministic doubles for all five capabilities, each with an invocation
//! counter and a failing variant. The mock generator reproduces the
//! attribution rule of the production prompt so scenario tests can assert the
//! source statement.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::AdapterError;
use crate::state::{DocumentSet, Flag};

use super::{Classifier, Generator, Grader, Label, Provenance, Retriever, SearchProvider};

fn failure() -> AdapterError {
    AdapterError::Transport("mock adapter failure".to_string())
}

/// Classifier returning a fixed label, or failing every call.
pub struct MockClassifier {
    label: Option<Label>,
    calls: AtomicUsize,
}

impl MockClassifier {
    pub fn yes() -> Self {
        Self {
            label: Some(Label::Yes),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn no() -> Self {
        Self {
            label: Some(Label::No),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            label: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, _question: &str) -> Result<Label, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.label.ok_or_else(failure)
    }
}

/// Retriever returning a fixed document set, or failing every call.
pub struct MockRetriever {
    documents: Option<DocumentSet>,
    calls: AtomicUsize,
}

impl MockRetriever {
    pub fn with_documents(documents: DocumentSet) -> Self {
        Self {
            documents: Some(documents),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::with_documents(DocumentSet::Empty)
    }

    pub fn failing() -> Self {
        Self {
            documents: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Retriever for MockRetriever {
    async fn retrieve(&self, _question: &str) -> Result<DocumentSet, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.documents.clone().ok_or_else(failure)
    }
}

/// Grader returning a fixed label, or failing every call.
pub struct MockGrader {
    label: Option<Label>,
    calls: AtomicUsize,
}

impl MockGrader {
    pub fn yes() -> Self {
        Self {
            label: Some(Label::Yes),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn no() -> Self {
        Self {
            label: Some(Label::No),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            label: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Grader for MockGrader {
    async fn grade(
        &self,
        _question: &str,
        _documents: &DocumentSet,
    ) -> Result<Label, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.label.ok_or_else(failure)
    }
}

/// Search provider returning fixed results, or failing every call.
pub struct MockSearch {
    results: Option<DocumentSet>,
    calls: AtomicUsize,
}

impl MockSearch {
    pub fn with_results(results: DocumentSet) -> Self {
        Self {
            results: Some(results),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            results: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for MockSearch {
    async fn search(&self, _query: &str) -> Result<DocumentSet, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.results.clone().ok_or_else(failure)
    }
}

/// Generator producing a deterministic answer with the production attribution
/// rule: personal collection when the grader approved the documents, outside
/// sources when it rejected them and search ran, no statement otherwise.
pub struct MockGenerator {
    fail: bool,
    calls: AtomicUsize,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(
        &self,
        question: &str,
        context: &DocumentSet,
        provenance: Provenance,
    ) -> Result<String, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(failure());
        }
        let source = if provenance.documents_relevant == Flag::Yes {
            "From the personal recipe collection. "
        } else if provenance.documents_relevant == Flag::No && provenance.web_search == Flag::Yes {
            "From outside sources. "
        } else {
            ""
        };
        Ok(format!(
            "{}Answer to {:?} using {} context passage(s).",
            source,
            question,
            context.len()
        ))
    }
}
