//! The gateway client: issues the network call, classifies the outcome,
//! and drives at most one compaction retry.
//!
//! Guarantees per logical `complete`: 1 or 2 outbound calls, never a
//! third, even when both attempts overflow. The session is read-only
//! from here — model selection goes through the registry's write barrier.

use crate::classify::{LexicalClassifier, OverflowClassifier};
use crate::registry::ModelRegistry;
use crate::request::{build_request, ChatRequest};
use async_trait::async_trait;
use codequill_core::prompt::Prompt;
use codequill_core::response::{FailureKind, GatewayResponse};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A raw reply from the chat endpoint, before classification.
#[derive(Debug, Clone)]
pub struct RawReply {
    pub status: u16,
    pub body: String,
}

/// Transport-level failure: the call never produced a reply.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct TransportFailure(pub String);

/// The seam between retry logic and the network. Production uses
/// [`HttpTransport`]; tests script replies through a mock.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<RawReply, TransportFailure>;
}

/// reqwest-backed transport with a bounded per-request timeout and
/// OpenRouter-style attribution headers.
pub struct HttpTransport {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    referer: String,
    title: String,
}

impl HttpTransport {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        referer: impl Into<String>,
        title: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            referer: referer.into(),
            title: title.into(),
        }
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> Result<RawReply, TransportFailure> {
        debug!(model = %request.model, compact = request.is_compacting(), "Sending completion request");

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportFailure(format!("request timed out: {e}"))
                } else {
                    TransportFailure(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportFailure(format!("failed to read response body: {e}")))?;

        Ok(RawReply { status, body })
    }
}

/// One classified attempt.
enum Attempt {
    Success(String),
    Failure(FailureKind, String),
}

/// The gateway client.
pub struct GatewayClient {
    registry: Arc<ModelRegistry>,
    transport: Arc<dyn ChatTransport>,
    classifier: Arc<dyn OverflowClassifier>,
}

impl GatewayClient {
    pub fn new(registry: Arc<ModelRegistry>, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            registry,
            transport,
            classifier: Arc::new(LexicalClassifier::default()),
        }
    }

    /// Replace the overflow classifier (e.g. with config-supplied markers).
    pub fn with_classifier(mut self, classifier: Arc<dyn OverflowClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Run one logical completion: build, send, classify, and retry once
    /// with compaction if (and only if) the first attempt overflowed.
    /// The second attempt's outcome is final either way.
    pub async fn complete(&self, prompt: &Prompt) -> GatewayResponse {
        let model = self.registry.current();
        let max_tokens = self.registry.max_output_tokens();

        let request = build_request(&model, prompt, max_tokens, false);
        match self.attempt(&request).await {
            Attempt::Success(content) => GatewayResponse::success(model, content),
            Attempt::Failure(FailureKind::ContextLengthExceeded, _) => {
                info!(model = %model, "Context length exceeded, retrying once with compaction");
                let retry = build_request(&model, prompt, max_tokens, true);
                match self.attempt(&retry).await {
                    Attempt::Success(content) => GatewayResponse::success(model, content),
                    Attempt::Failure(kind, detail) => {
                        warn!(model = %model, kind = %kind, "Compaction retry failed");
                        GatewayResponse::failure(model, kind, detail)
                    }
                }
            }
            Attempt::Failure(kind, detail) => {
                warn!(model = %model, kind = %kind, detail = %detail, "Completion failed");
                GatewayResponse::failure(model, kind, detail)
            }
        }
    }

    async fn attempt(&self, request: &ChatRequest) -> Attempt {
        match self.transport.send(request).await {
            Ok(reply) => self.classify(reply),
            Err(e) => Attempt::Failure(FailureKind::TransportError, e.to_string()),
        }
    }

    fn classify(&self, reply: RawReply) -> Attempt {
        let ok_status = (200..300).contains(&reply.status);

        match serde_json::from_str::<ApiResponse>(&reply.body) {
            Ok(parsed) => {
                if let Some(content) = parsed
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.message.content)
                {
                    return Attempt::Success(content);
                }

                if let Some(error) = parsed.error {
                    if self.classifier.is_context_overflow(&error.message) {
                        return Attempt::Failure(
                            FailureKind::ContextLengthExceeded,
                            error.message,
                        );
                    }
                    return Attempt::Failure(FailureKind::RemoteError, error.message);
                }

                if ok_status {
                    Attempt::Failure(
                        FailureKind::MalformedResponse,
                        "response contained neither choices nor error".into(),
                    )
                } else {
                    Attempt::Failure(
                        FailureKind::RemoteError,
                        format!("{} - {}", reply.status, reply.body),
                    )
                }
            }
            Err(_) if ok_status => Attempt::Failure(
                FailureKind::MalformedResponse,
                format!("unparsable response body: {}", reply.body),
            ),
            Err(_) => {
                // Some gateways report overflow as plain text on a 4xx.
                if self.classifier.is_context_overflow(&reply.body) {
                    Attempt::Failure(FailureKind::ContextLengthExceeded, reply.body)
                } else {
                    Attempt::Failure(
                        FailureKind::RemoteError,
                        format!("{} - {}", reply.status, reply.body),
                    )
                }
            }
        }
    }
}

// --- Wire types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use codequill_core::model::{ModelCatalog, ModelId};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    const OVERFLOW_BODY: &str = r#"{"error":{"message":"This model's maximum context length is 4096 tokens, however you requested 5200 tokens"}}"#;
    const OK_BODY: &str = r#"{"choices":[{"message":{"role":"assistant","content":"ok"}}]}"#;

    /// Scripted transport: pops one reply per call and records every
    /// request it was sent.
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<RawReply, TransportFailure>>>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<Result<RawReply, TransportFailure>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn request(&self, i: usize) -> ChatRequest {
            self.requests.lock().unwrap()[i].clone()
        }
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn send(&self, request: &ChatRequest) -> Result<RawReply, TransportFailure> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("transport called more times than scripted")
        }
    }

    fn reply(status: u16, body: &str) -> Result<RawReply, TransportFailure> {
        Ok(RawReply {
            status,
            body: body.into(),
        })
    }

    fn client_with(
        transport: Arc<ScriptedTransport>,
    ) -> (Arc<ModelRegistry>, GatewayClient) {
        let catalog = ModelCatalog::new(vec![ModelId::new("m1"), ModelId::new("m2")]).unwrap();
        let registry = Arc::new(ModelRegistry::new(catalog));
        let client = GatewayClient::new(registry.clone(), transport);
        (registry, client)
    }

    #[tokio::test]
    async fn success_takes_one_call() {
        let transport = Arc::new(ScriptedTransport::new(vec![reply(200, OK_BODY)]));
        let (_registry, client) = client_with(transport.clone());

        let resp = client.complete(&Prompt::text("hi")).await;
        assert_eq!(resp.content(), Some("ok"));
        assert_eq!(resp.model.as_str(), "m1");
        assert_eq!(transport.calls(), 1);
        assert!(!transport.request(0).is_compacting());
    }

    #[tokio::test]
    async fn overflow_then_success_retries_with_compaction() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            reply(200, OVERFLOW_BODY),
            reply(200, OK_BODY),
        ]));
        let (registry, client) = client_with(transport.clone());
        registry.select(&ModelId::new("m2")).unwrap();

        let resp = client.complete(&Prompt::text("hi")).await;
        assert_eq!(resp.content(), Some("ok"));
        assert_eq!(resp.model.as_str(), "m2");

        assert_eq!(transport.calls(), 2);
        assert!(!transport.request(0).is_compacting());
        assert!(transport.request(1).is_compacting());
    }

    #[tokio::test]
    async fn double_overflow_stops_at_two_calls() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            reply(200, OVERFLOW_BODY),
            reply(200, OVERFLOW_BODY),
        ]));
        let (_registry, client) = client_with(transport.clone());

        let resp = client.complete(&Prompt::text("hi")).await;
        assert_eq!(
            resp.failure_kind(),
            Some(FailureKind::ContextLengthExceeded)
        );
        // Never a third call, even though the retry itself overflowed.
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn transport_error_is_terminal() {
        let transport = Arc::new(ScriptedTransport::new(vec![Err(TransportFailure(
            "connection refused".into(),
        ))]));
        let (_registry, client) = client_with(transport.clone());

        let resp = client.complete(&Prompt::text("hi")).await;
        assert_eq!(resp.failure_kind(), Some(FailureKind::TransportError));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn remote_error_is_terminal() {
        let transport = Arc::new(ScriptedTransport::new(vec![reply(
            200,
            r#"{"error":{"message":"invalid api key"}}"#,
        )]));
        let (_registry, client) = client_with(transport.clone());

        let resp = client.complete(&Prompt::text("hi")).await;
        assert_eq!(resp.failure_kind(), Some(FailureKind::RemoteError));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn unparsable_2xx_is_malformed() {
        let transport = Arc::new(ScriptedTransport::new(vec![reply(200, "<html>oops</html>")]));
        let (_registry, client) = client_with(transport.clone());

        let resp = client.complete(&Prompt::text("hi")).await;
        assert_eq!(resp.failure_kind(), Some(FailureKind::MalformedResponse));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn empty_2xx_json_is_malformed() {
        let transport = Arc::new(ScriptedTransport::new(vec![reply(200, "{}")]));
        let (_registry, client) = client_with(transport.clone());

        let resp = client.complete(&Prompt::text("hi")).await;
        assert_eq!(resp.failure_kind(), Some(FailureKind::MalformedResponse));
    }

    #[tokio::test]
    async fn plain_text_4xx_overflow_still_triggers_retry() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            reply(400, "maximum context length exceeded for this model"),
            reply(200, OK_BODY),
        ]));
        let (_registry, client) = client_with(transport.clone());

        let resp = client.complete(&Prompt::text("hi")).await;
        assert_eq!(resp.content(), Some("ok"));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn non_overflow_4xx_is_remote_error() {
        let transport = Arc::new(ScriptedTransport::new(vec![reply(500, "bad gateway")]));
        let (_registry, client) = client_with(transport.clone());

        let resp = client.complete(&Prompt::text("hi")).await;
        assert_eq!(resp.failure_kind(), Some(FailureKind::RemoteError));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn failure_reports_the_model_active_at_request_time() {
        let transport = Arc::new(ScriptedTransport::new(vec![Err(TransportFailure(
            "down".into(),
        ))]));
        let (registry, client) = client_with(transport.clone());
        registry.select(&ModelId::new("m2")).unwrap();

        let resp = client.complete(&Prompt::text("hi")).await;
        assert_eq!(resp.model.as_str(), "m2");
        assert!(!resp.is_success());
    }

    #[tokio::test]
    async fn custom_classifier_is_honored() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            reply(200, r#"{"error":{"message":"prompt too large"}}"#),
            reply(200, OK_BODY),
        ]));
        let catalog = ModelCatalog::new(vec![ModelId::new("m1")]).unwrap();
        let registry = Arc::new(ModelRegistry::new(catalog));
        let client = GatewayClient::new(registry, transport.clone())
            .with_classifier(Arc::new(LexicalClassifier::new(vec![
                "prompt too large".into()
            ])));

        let resp = client.complete(&Prompt::text("hi")).await;
        assert_eq!(resp.content(), Some("ok"));
        assert_eq!(transport.calls(), 2);
    }
}
