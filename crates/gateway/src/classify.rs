//! Context-overflow detection.
//!
//! The remote endpoint reports context-length overflow only as prose
//! inside an error message — there is no structured status for it. The
//! predicate therefore lives behind a trait so deployments can replace
//! the match list when the upstream wording changes, rather than
//! patching the retry logic. Known compatibility risk, kept visible.

/// Decides whether a failure detail describes a context-length overflow.
pub trait OverflowClassifier: Send + Sync {
    fn is_context_overflow(&self, detail: &str) -> bool;
}

/// The default classifier: case-insensitive substring match against a
/// configurable marker list.
pub struct LexicalClassifier {
    markers: Vec<String>,
}

impl LexicalClassifier {
    pub fn new(markers: Vec<String>) -> Self {
        Self {
            markers: markers.into_iter().map(|m| m.to_lowercase()).collect(),
        }
    }
}

impl Default for LexicalClassifier {
    fn default() -> Self {
        Self::new(vec![
            "maximum context length".into(),
            "context length exceeded".into(),
            "context_length_exceeded".into(),
        ])
    }
}

impl OverflowClassifier for LexicalClassifier {
    fn is_context_overflow(&self, detail: &str) -> bool {
        let detail = detail.to_lowercase();
        self.markers.iter().any(|m| detail.contains(m))
    }
}
