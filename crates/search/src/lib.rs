//! Web search for CodeQuill.
//!
//! All backends implement `codequill_core::SearchBackend`; the aggregator
//! normalizes their behavior (result cap, synthetic error entry) so the
//! facade always receives a uniform, renderable sequence.

pub mod aggregator;
pub mod duckduckgo;
pub mod serpapi;

pub use aggregator::{SearchAggregator, RESULT_CAP};
pub use duckduckgo::DuckDuckGoBackend;
pub use serpapi::SerpApiBackend;

use codequill_config::AppConfig;
use codequill_core::error::SearchError;
use codequill_core::search::SearchBackend;
use std::sync::Arc;

/// Build the deployment's single active backend from configuration.
///
/// Backend choice is a deployment-time decision; there is no per-request
/// or automatic runtime fallback between backends.
pub fn build_from_config(config: &AppConfig) -> Result<SearchAggregator, SearchError> {
    let backend: Arc<dyn SearchBackend> = match config.search.backend.as_str() {
        "serpapi" => {
            let api_key = config.search.serpapi_api_key.clone().ok_or_else(|| {
                SearchError::NotConfigured(
                    "serpapi backend selected but no API key provided".into(),
                )
            })?;
            Arc::new(SerpApiBackend::new(api_key))
        }
        "duckduckgo" => Arc::new(DuckDuckGoBackend::new()),
        other => {
            return Err(SearchError::NotConfigured(format!(
                "unknown search backend '{other}'"
            )));
        }
    };

    Ok(SearchAggregator::new(backend))
}
