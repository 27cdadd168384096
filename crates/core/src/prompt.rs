//! The normalized prompt — the single textual representation every kind of
//! input (text, image, video frame) is reduced to before it reaches the
//! gateway.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// A base64-encoded JPEG embedded in a prompt.
///
/// Always JPEG: the normalizer re-encodes whatever it was handed into a
/// canonical colorspace and format, so downstream code never has to guess
/// the payload type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    base64: String,
}

impl ImagePayload {
    /// Encode JPEG bytes into a payload. The bytes are not retained.
    pub fn from_jpeg_bytes(jpeg: &[u8]) -> Self {
        Self {
            base64: BASE64.encode(jpeg),
        }
    }

    pub fn as_base64(&self) -> &str {
        &self.base64
    }

    /// Recover the JPEG bytes. Round-trips byte-identically with
    /// [`ImagePayload::from_jpeg_bytes`].
    pub fn to_jpeg_bytes(&self) -> Vec<u8> {
        // Infallible: the only constructor encodes valid base64.
        BASE64.decode(&self.base64).unwrap_or_default()
    }
}

/// A prompt: text plus an optional embedded image payload.
///
/// Total serialized size is unbounded at construction time; the remote
/// endpoint may reject it, and compaction happens only after rejection,
/// never speculatively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImagePayload>,
}

impl Prompt {
    /// A plain text prompt with no image payload.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }

    /// A prompt carrying an embedded image.
    pub fn with_image(text: impl Into<String>, image: ImagePayload) -> Self {
        Self {
            text: text.into(),
            image: Some(image),
        }
    }

    /// Render the transmission form: the text, with the image (if any)
    /// appended as a tagged data-URL reference.
    pub fn render(&self) -> String {
        match &self.image {
            None => self.text.clone(),
            Some(payload) => format!(
                "{}\n[image: data:image/jpeg;base64,{}]",
                self.text,
                payload.as_base64()
            ),
        }
    }
}
