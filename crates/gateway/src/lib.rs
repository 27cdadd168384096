//! Model gateway for CodeQuill.
//!
//! Routes normalized prompts to a remote chat-completion endpoint and
//! returns structured, value-typed results. Owns the process-wide model
//! session, the wire payload builder, overflow classification, and the
//! single bounded compaction retry.

pub mod classify;
pub mod client;
pub mod registry;
pub mod request;

pub use classify::{LexicalClassifier, OverflowClassifier};
pub use client::{ChatTransport, GatewayClient, HttpTransport, RawReply, TransportFailure};
pub use registry::{ModelRegistry, DEFAULT_MAX_OUTPUT_TOKENS};
pub use request::{build_request, ChatMessage, ChatRequest};

use codequill_config::AppConfig;
use codequill_core::error::ModelError;
use codequill_core::model::{ModelCatalog, ModelId};
use std::sync::Arc;

/// Build the shared registry and gateway client from configuration.
///
/// This is the composition root for the gateway: one session, constructed
/// at process start and threaded through by reference — never a runtime
/// singleton.
pub fn build_from_config(
    config: &AppConfig,
) -> Result<(Arc<ModelRegistry>, GatewayClient), ModelError> {
    let catalog = ModelCatalog::new(config.models.iter().map(|m| ModelId::new(m)).collect())?;

    let registry = Arc::new(ModelRegistry::with_max_tokens(
        catalog,
        config.max_output_tokens,
    ));

    let transport = HttpTransport::new(
        &config.api_url,
        config.api_key.clone().unwrap_or_default(),
        &config.site_url,
        &config.site_name,
        std::time::Duration::from_secs(config.request_timeout_secs),
    );

    let classifier = LexicalClassifier::new(config.overflow_markers.clone());

    let client = GatewayClient::new(registry.clone(), Arc::new(transport))
        .with_classifier(Arc::new(classifier));

    Ok((registry, client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_from_default_config() {
        let config = AppConfig::default();
        let (registry, _client) = build_from_config(&config).unwrap();
        assert_eq!(registry.current().as_str(), "openai/gpt-3.5-turbo");
        assert_eq!(registry.max_output_tokens(), 500);
    }

    #[test]
    fn build_rejects_empty_catalog() {
        let config = AppConfig {
            models: vec![],
            ..AppConfig::default()
        };
        assert!(build_from_config(&config).is_err());
    }
}
