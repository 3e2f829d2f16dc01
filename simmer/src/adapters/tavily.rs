//! Tavily web search adapter.
//!
//! One POST per query; result contents are folded into a single passage, which
//! is what the generator receives when the pipeline falls back to the web.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::error::AdapterError;
use crate::state::DocumentSet;

use super::SearchProvider;

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";
const DEFAULT_MAX_RESULTS: u64 = 3;

/// Web search via the Tavily REST API.
///
/// **Interaction**: Implements [`SearchProvider`]; used by the web-search node.
pub struct TavilySearch {
    http: reqwest::Client,
    api_key: String,
    max_results: u64,
}

impl TavilySearch {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_max_results(mut self, max_results: u64) -> Self {
        self.max_results = max_results;
        self
    }
}

/// Joins the `content` of every result into one passage; None when no result
/// carries content.
fn join_results(value: &serde_json::Value) -> Option<String> {
    let contents: Vec<&str> = value
        .get("results")
        .and_then(|r| r.as_array())
        .map(|list| {
            list.iter()
                .filter_map(|r| r.get("content").and_then(|c| c.as_str()))
                .filter(|c| !c.trim().is_empty())
                .collect()
        })
        .unwrap_or_default();
    if contents.is_empty() {
        None
    } else {
        Some(contents.join("\n\n"))
    }
}

#[async_trait]
impl SearchProvider for TavilySearch {
    async fn search(&self, query: &str) -> Result<DocumentSet, AdapterError> {
        let body = json!({
            "api_key": self.api_key,
            "query": query,
            "max_results": self.max_results,
        });

        debug!(max_results = self.max_results, "Tavily search");
        let response = self
            .http
            .post(TAVILY_SEARCH_URL)
            .json(&body)
            .send()
            .await
            .map_err(|e| AdapterError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status();
            let err_body = response.text().await.unwrap_or_default();
            return Err(AdapterError::Transport(format!(
                "Tavily API error {}: {}",
                status, err_body
            )));
        }
        let out: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AdapterError::MalformedOutput(e.to_string()))?;

        Ok(match join_results(&out) {
            Some(joined) => DocumentSet::Single(joined),
            None => DocumentSet::Empty,
        })
    }
}
