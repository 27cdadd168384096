//! The assistant facade — the only surface the UI collaborator calls.
//!
//! Composes the registry, gateway, normalizer, and search aggregator into
//! the operations the surrounding application needs. Every failure
//! crosses this boundary as a value: media errors become failure-valued
//! [`GatewayResponse`]s, search errors become a synthetic result entry,
//! and nothing here returns `Err` except model selection (whose rejection
//! *is* the contract).
//!
//! Prompt policy lives here: the remote model is told to answer as the
//! selected model but to keep its identity out of the answer body — the
//! identity is reported out-of-band in `GatewayResponse::model`.

use codequill_config::AppConfig;
use codequill_core::error::{ModelError, SearchError};
use codequill_core::model::{ModelCatalog, ModelId};
use codequill_core::response::GatewayResponse;
use codequill_core::search::SearchResult;
use codequill_gateway::{GatewayClient, ModelRegistry};
use codequill_media::VideoSource;
use codequill_search::SearchAggregator;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::info;

/// Errors raised while assembling an assistant from configuration.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("model configuration invalid: {0}")]
    Model(#[from] ModelError),

    #[error("search configuration invalid: {0}")]
    Search(#[from] SearchError),
}

pub struct Assistant {
    registry: Arc<ModelRegistry>,
    gateway: GatewayClient,
    search: SearchAggregator,
}

impl Assistant {
    /// Compose an assistant from already-built parts (tests, embedders).
    pub fn new(
        registry: Arc<ModelRegistry>,
        gateway: GatewayClient,
        search: SearchAggregator,
    ) -> Self {
        Self {
            registry,
            gateway,
            search,
        }
    }

    /// The composition root for production use: one registry, one gateway
    /// client, one search aggregator, all from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, BuildError> {
        let (registry, gateway) = codequill_gateway::build_from_config(config)?;
        let search = codequill_search::build_from_config(config)?;
        info!(model = %registry.current(), backend = search.backend_name(), "Assistant ready");
        Ok(Self::new(registry, gateway, search))
    }

    /// Answer a free-text query.
    pub async fn process_text(&self, text: &str) -> GatewayResponse {
        let prompt = codequill_media::from_text(text_template(text));
        self.gateway.complete(&prompt).await
    }

    /// Answer a question about an image.
    pub async fn process_image(&self, image_bytes: &[u8], question: &str) -> GatewayResponse {
        match codequill_media::from_image(image_bytes, &media_template(question)) {
            Ok(prompt) => self.gateway.complete(&prompt).await,
            Err(e) => GatewayResponse::failure(
                self.registry.current(),
                e.failure_kind(),
                e.to_string(),
            ),
        }
    }

    /// Answer a question about a video (its first decodable frame).
    pub async fn process_video(&self, source: VideoSource, question: &str) -> GatewayResponse {
        match codequill_media::from_video(source, &media_template(question)).await {
            Ok(prompt) => self.gateway.complete(&prompt).await,
            Err(e) => GatewayResponse::failure(
                self.registry.current(),
                e.failure_kind(),
                e.to_string(),
            ),
        }
    }

    /// Run a web search. Always renderable, at most 5 entries.
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        self.search.search(query).await
    }

    /// Search the web, then fold the results into a follow-up prompt and
    /// send it through the gateway.
    pub async fn research(&self, query: &str) -> GatewayResponse {
        let results = self.search.search(query).await;
        let prompt = codequill_media::from_text(research_template(query, &results));
        self.gateway.complete(&prompt).await
    }

    /// Select the active model. Rejections leave the selection unchanged.
    pub fn set_model(&self, id: &ModelId) -> Result<(), ModelError> {
        self.registry.select(id)
    }

    /// The fixed catalog, in priority order.
    pub fn list_models(&self) -> &ModelCatalog {
        self.registry.list()
    }

    /// The currently selected model.
    pub fn current_model(&self) -> ModelId {
        self.registry.current()
    }
}

const IDENTITY_POLICY: &str = "Do not state which model you are in your answer.";

fn text_template(text: &str) -> String {
    format!("As an AI coding assistant, respond to the following. {IDENTITY_POLICY}\n\n{text}")
}

fn media_template(question: &str) -> String {
    let question = if question.trim().is_empty() {
        "Describe what you see."
    } else {
        question
    };
    format!(
        "As an AI coding assistant, answer the question about the attached image. \
         {IDENTITY_POLICY}\n\nQuestion: {question}"
    )
}

fn research_template(query: &str, results: &[SearchResult]) -> String {
    let mut block = String::new();
    if results.is_empty() {
        block.push_str("(no results)\n");
    }
    for (i, hit) in results.iter().enumerate() {
        let _ = writeln!(
            block,
            "{}. {} — {}\n   {}",
            i + 1,
            hit.title,
            hit.link,
            hit.snippet
        );
    }
    format!(
        "As an AI coding assistant, use these web search results to answer the query. \
         {IDENTITY_POLICY}\n\nQuery: {query}\n\nSearch results:\n{block}"
    )
}
