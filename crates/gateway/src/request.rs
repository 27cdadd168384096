//! Wire payload construction.
//!
//! `build_request` is a pure function: no network, no mutable state. The
//! remote endpoint is multi-model and otherwise ignorant of which persona
//! it should present, so every request carries a system message binding
//! the response to the selected model's identity.

use codequill_core::model::ModelId;
use codequill_core::prompt::Prompt;
use serde::{Deserialize, Serialize};

/// The compaction transform understood by the remote endpoint. This is a
/// payload-level flag, not a local text transformation.
pub const COMPACTION_TRANSFORM: &str = "middle-out";

/// One message in the wire payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// The chat-completion request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    /// Provider-level context transforms. Present only when compacting.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<String>,
}

impl ChatRequest {
    /// Whether this request asks the endpoint to compact context.
    pub fn is_compacting(&self) -> bool {
        self.transforms.iter().any(|t| t == COMPACTION_TRANSFORM)
    }
}

/// Build the wire payload for one attempt.
pub fn build_request(
    model: &ModelId,
    prompt: &Prompt,
    max_tokens: u32,
    compact: bool,
) -> ChatRequest {
    let transforms = if compact {
        vec![COMPACTION_TRANSFORM.into()]
    } else {
        Vec::new()
    };

    ChatRequest {
        model: model.as_str().into(),
        messages: vec![
            ChatMessage::system(format!("You are {model}.")),
            ChatMessage::user(prompt.render()),
        ],
        max_tokens,
        transforms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_identity_system_message() {
        let req = build_request(&ModelId::new("openai/gpt-4"), &Prompt::text("hi"), 500, false);
        assert_eq!(req.model, "openai/gpt-4");
        assert_eq!(req.messages[0].role, "system");
        assert_eq!(req.messages[0].content, "You are openai/gpt-4.");
        assert_eq!(req.messages[1].role, "user");
        assert_eq!(req.messages[1].content, "hi");
        assert_eq!(req.max_tokens, 500);
    }

    #[test]
    fn plain_request_serializes_without_transforms() {
        let req = build_request(&ModelId::new("m1"), &Prompt::text("hi"), 500, false);
        assert!(!req.is_compacting());
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("transforms"));
    }

    #[test]
    fn compacting_request_signals_middle_out() {
        let req = build_request(&ModelId::new("m1"), &Prompt::text("hi"), 500, true);
        assert!(req.is_compacting());
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"transforms\":[\"middle-out\"]"));
    }

    #[test]
    fn image_prompt_is_rendered_into_the_user_message() {
        use codequill_core::prompt::ImagePayload;

        let payload = ImagePayload::from_jpeg_bytes(&[0xFF, 0xD8, 0xFF, 0xD9]);
        let prompt = Prompt::with_image("what is this?", payload);
        let req = build_request(&ModelId::new("m1"), &prompt, 500, false);
        assert!(req.messages[1]
            .content
            .contains("data:image/jpeg;base64,"));
    }
}
