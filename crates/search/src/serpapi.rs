//! SerpApi backend — the paid, authenticated option.
//!
//! Wraps the `search.json` endpoint and maps `organic_results` into the
//! common schema.

use async_trait::async_trait;
use codequill_core::error::SearchError;
use codequill_core::search::{SearchBackend, SearchResult};
use serde::Deserialize;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://serpapi.com/search.json";

pub struct SerpApiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SerpApiBackend {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
        }
    }

    /// Override the endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SearchBackend for SerpApiBackend {
    fn name(&self) -> &str {
        "serpapi"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        debug!(query, "Querying SerpApi");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api { status, message });
        }

        let body: SerpResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Malformed(e.to_string()))?;

        Ok(body
            .organic_results
            .into_iter()
            .map(|r| SearchResult::new(r.title, r.snippet.unwrap_or_default(), r.link))
            .collect())
    }
}

// --- Wire types (internal) ---

#[derive(Debug, Deserialize)]
struct SerpResponse {
    #[serde(default)]
    organic_results: Vec<SerpOrganicResult>,
}

#[derive(Debug, Deserialize)]
struct SerpOrganicResult {
    title: String,
    #[serde(default)]
    snippet: Option<String>,
    link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_organic_results() {
        let body = r#"{
            "organic_results": [
                {"title": "The Rust Book", "snippet": "Learn Rust", "link": "https://doc.rust-lang.org/book/", "position": 1},
                {"title": "crates.io", "link": "https://crates.io"}
            ],
            "search_metadata": {"status": "Success"}
        }"#;
        let parsed: SerpResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.organic_results.len(), 2);
        assert_eq!(parsed.organic_results[0].title, "The Rust Book");
        assert!(parsed.organic_results[1].snippet.is_none());
    }

    #[test]
    fn parse_empty_response() {
        let parsed: SerpResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.organic_results.is_empty());
    }
}
