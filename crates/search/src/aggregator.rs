//! The search aggregator: the only search surface the facade sees.
//!
//! Never fails outward. Backend errors become one synthetic `Error`
//! entry; a successful query with zero hits stays an empty list (an
//! empty result is an answer, not a failure).

use codequill_core::search::{SearchBackend, SearchResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Result sequences are truncated to this length, preserving the
/// backend's relevance order.
pub const RESULT_CAP: usize = 5;

pub struct SearchAggregator {
    backend: Arc<dyn SearchBackend>,
}

impl SearchAggregator {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// The active backend's name, for logging and diagnostics.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Run a query. Always returns a renderable sequence of at most
    /// [`RESULT_CAP`] entries.
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        match self.backend.search(query).await {
            Ok(mut results) => {
                debug!(
                    backend = self.backend.name(),
                    hits = results.len(),
                    "Search completed"
                );
                results.truncate(RESULT_CAP);
                results
            }
            Err(e) => {
                warn!(backend = self.backend.name(), error = %e, "Search backend failed");
                vec![SearchResult::error(e.to_string())]
            }
        }
    }
}
