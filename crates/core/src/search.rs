//! Web search domain: the common result schema and the backend seam.
//!
//! Backends return heterogeneous shapes; everything is normalized into
//! [`SearchResult`] before it leaves the search crate.

use crate::error::SearchError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One normalized search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

impl SearchResult {
    pub fn new(
        title: impl Into<String>,
        snippet: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            link: link.into(),
        }
    }

    /// The synthetic entry the aggregator emits when the backend fails,
    /// so callers always receive a uniform, renderable sequence.
    pub fn error(detail: impl Into<String>) -> Self {
        Self {
            title: "Error".into(),
            snippet: detail.into(),
            link: String::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.title == "Error" && self.link.is_empty()
    }
}

/// A web search backend.
///
/// Exactly one backend is active per deployment, selected by
/// configuration — there is no per-request backend choice.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// A short name for logging (e.g. "serpapi", "duckduckgo").
    fn name(&self) -> &str;

    /// Run the query, preserving the backend's relevance order.
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError>;
}
