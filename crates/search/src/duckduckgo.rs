//! DuckDuckGo backend — the unauthenticated option.
//!
//! Uses the instant-answer JSON endpoint: the abstract (if any) becomes
//! the first result, followed by related topics. Topic groups are
//! flattened one level, preserving the order the API returned.

use async_trait::async_trait;
use codequill_core::error::SearchError;
use codequill_core::search::{SearchBackend, SearchResult};
use serde::Deserialize;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.duckduckgo.com/";

pub struct DuckDuckGoBackend {
    client: reqwest::Client,
    base_url: String,
}

impl DuckDuckGoBackend {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: DEFAULT_BASE_URL.into(),
        }
    }

    /// Override the endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for DuckDuckGoBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchBackend for DuckDuckGoBackend {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        debug!(query, "Querying DuckDuckGo");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api { status, message });
        }

        let body: DdgResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Malformed(e.to_string()))?;

        Ok(flatten(body))
    }
}

fn flatten(body: DdgResponse) -> Vec<SearchResult> {
    let mut results = Vec::new();

    if !body.abstract_text.is_empty() {
        results.push(SearchResult::new(
            body.heading,
            body.abstract_text,
            body.abstract_url,
        ));
    }

    for topic in body.related_topics {
        collect_topic(topic, &mut results);
    }

    results
}

fn collect_topic(topic: DdgTopic, out: &mut Vec<SearchResult>) {
    if let (Some(text), Some(url)) = (&topic.text, &topic.first_url) {
        // Topic text reads "Title - description"; keep the full text as
        // the snippet and the leading segment as the title.
        let title = text.split(" - ").next().unwrap_or(text).to_string();
        out.push(SearchResult::new(title, text.clone(), url.clone()));
    }
    for sub in topic.topics {
        collect_topic(sub, out);
    }
}

// --- Wire types (internal) ---

#[derive(Debug, Deserialize)]
struct DdgResponse {
    #[serde(rename = "Heading", default)]
    heading: String,
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<DdgTopic>,
}

#[derive(Debug, Deserialize)]
struct DdgTopic {
    #[serde(rename = "Text", default)]
    text: Option<String>,
    #[serde(rename = "FirstURL", default)]
    first_url: Option<String>,
    /// Grouped sub-topics (category sections).
    #[serde(rename = "Topics", default)]
    topics: Vec<DdgTopic>,
}
