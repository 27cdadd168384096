//! Error types for the CodeQuill domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.
//!
//! Gateway failures are deliberately *not* represented here as an error
//! enum: the gateway reports them as value-typed outcomes inside
//! [`crate::response::GatewayResponse`], because nothing is allowed to
//! throw across the facade boundary.

use crate::model::ModelId;
use crate::response::FailureKind;
use thiserror::Error;

/// Model catalog and selection errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("model not in catalog: {0}")]
    InvalidModel(ModelId),

    #[error("model catalog must contain at least one model")]
    EmptyCatalog,
}

/// Input normalization errors.
///
/// `VideoRead` is kept distinct from `ImageDecode` on purpose: a source
/// with zero decodable frames is the most common real-world failure for
/// video input and callers need to tell the two apart.
#[derive(Debug, Clone, Error)]
pub enum MediaError {
    #[error("image decode failed: {0}")]
    ImageDecode(String),

    #[error("video read failed: {0}")]
    VideoRead(String),
}

impl MediaError {
    /// The failure kind reported when this error surfaces in a
    /// [`crate::response::GatewayResponse`].
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            MediaError::ImageDecode(_) => FailureKind::ImageDecode,
            MediaError::VideoRead(_) => FailureKind::VideoRead,
        }
    }
}

/// Search backend errors.
///
/// These never escape the aggregator — it converts every variant into a
/// single synthetic result entry so callers always get a renderable list.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed search response: {0}")]
    Malformed(String),

    #[error("search backend not configured: {0}")]
    NotConfigured(String),
}
