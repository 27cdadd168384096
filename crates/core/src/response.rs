//! The structured result every gateway call resolves to.
//!
//! Failures are values, not `Err`s: the UI collaborator never catches
//! anything, it inspects the outcome. The `model` field always names the
//! model that was active at request time — on failure too, so errors can
//! be attributed to a specific configuration.

use crate::model::ModelId;
use serde::{Deserialize, Serialize};

/// Classification of a failed gateway call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The prompt exceeded the remote model's input capacity.
    /// Recoverable exactly once, via a compaction retry.
    ContextLengthExceeded,
    /// The endpoint returned a structured failure.
    RemoteError,
    /// Network or connection failure.
    TransportError,
    /// 2xx response with an unparsable body.
    MalformedResponse,
    /// Image input could not be decoded.
    ImageDecode,
    /// No decodable frame in the video source.
    VideoRead,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FailureKind::ContextLengthExceeded => "context_length_exceeded",
            FailureKind::RemoteError => "remote_error",
            FailureKind::TransportError => "transport_error",
            FailureKind::MalformedResponse => "malformed_response",
            FailureKind::ImageDecode => "image_decode",
            FailureKind::VideoRead => "video_read",
        };
        write!(f, "{s}")
    }
}

/// Success or classified failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success { content: String },
    Failure { kind: FailureKind, detail: String },
}

/// The discriminated result of one logical gateway call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayResponse {
    /// The model active when the request was issued.
    pub model: ModelId,
    pub outcome: Outcome,
}

impl GatewayResponse {
    pub fn success(model: ModelId, content: impl Into<String>) -> Self {
        Self {
            model,
            outcome: Outcome::Success {
                content: content.into(),
            },
        }
    }

    pub fn failure(model: ModelId, kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            model,
            outcome: Outcome::Failure {
                kind,
                detail: detail.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }

    /// The generated text, if this call succeeded.
    pub fn content(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Success { content } => Some(content),
            Outcome::Failure { .. } => None,
        }
    }

    /// The failure classification, if this call failed.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.outcome {
            Outcome::Success { .. } => None,
            Outcome::Failure { kind, .. } => Some(*kind),
        }
    }
}
