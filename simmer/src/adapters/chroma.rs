//! Chroma vector-store retriever over HTTP.
//!
//! Embeds the question through an injected [`Embedder`], then queries a Chroma
//! collection's `query` endpoint. Assumes the collection is already populated
//! by a separate ingestion pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::error::AdapterError;
use crate::state::{Document, DocumentSet};

use super::{Embedder, Retriever};

/// Retriever backed by a Chroma collection.
///
/// **Interaction**: Implements [`Retriever`]; holds an [`Embedder`] for the
/// query vector. Safe for concurrent use; `reqwest::Client` pools connections.
pub struct ChromaRetriever {
    http: reqwest::Client,
    base_url: String,
    collection: String,
    api_key: Option<String>,
    embedder: Arc<dyn Embedder>,
    top_k: usize,
}

impl ChromaRetriever {
    /// `base_url` is the Chroma server root (e.g. `http://localhost:8000`).
    pub fn new(
        base_url: impl Into<String>,
        collection: impl Into<String>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            collection: collection.into(),
            api_key: None,
            embedder,
            top_k: 1,
        }
    }

    /// Token for hosted Chroma; sent as `X-Chroma-Token`.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Number of passages to fetch per query.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    fn query_url(&self) -> String {
        format!(
            "{}/api/v1/collections/{}/query",
            self.base_url.trim_end_matches('/'),
            self.collection
        )
    }
}

/// Maps a Chroma query response to a document set.
///
/// Chroma nests results per query vector: `documents[0]` is the passage list
/// for our single query, `metadatas[0]` the parallel metadata list (entries
/// may be null).
fn parse_query_response(value: &serde_json::Value) -> DocumentSet {
    let passages: Vec<&str> = value
        .get("documents")
        .and_then(|d| d.get(0))
        .and_then(|d| d.as_array())
        .map(|list| list.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();
    if passages.is_empty() {
        return DocumentSet::Empty;
    }

    let metadatas = value
        .get("metadatas")
        .and_then(|m| m.get(0))
        .and_then(|m| m.as_array());

    let docs: Vec<Document> = passages
        .iter()
        .enumerate()
        .map(|(i, content)| {
            let mut doc = Document::new(*content);
            if let Some(meta) = metadatas
                .and_then(|list| list.get(i))
                .and_then(|m| m.as_object())
            {
                for (key, val) in meta {
                    let rendered = match val.as_str() {
                        Some(s) => s.to_string(),
                        None => val.to_string(),
                    };
                    doc.metadata.insert(key.clone(), rendered);
                }
            }
            doc
        })
        .collect();
    DocumentSet::Many(docs)
}

#[async_trait]
impl Retriever for ChromaRetriever {
    async fn retrieve(&self, question: &str) -> Result<DocumentSet, AdapterError> {
        let vector = self.embedder.embed(question).await?;
        let body = json!({
            "query_embeddings": [vector],
            "n_results": self.top_k,
            "include": ["documents", "metadatas"],
        });

        let url = self.query_url();
        debug!(url = %url, top_k = self.top_k, "Chroma query");
        let mut request = self.http.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.header("X-Chroma-Token", key);
        }
        let response = request
            .send()
            .await
            .map_err(|e| AdapterError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status();
            let err_body = response.text().await.unwrap_or_default();
            return Err(AdapterError::Transport(format!(
                "Chroma API error {}: {}",
                status, err_body
            )));
        }
        let out: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AdapterError::MalformedOutput(e.to_string()))?;
        Ok(parse_query_response(&out))
    }
}
