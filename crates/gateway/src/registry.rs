//! The model registry: the one shared, lock-guarded session.
//!
//! There is intentionally exactly one of these per process — it represents
//! "the model the user is currently talking to", not per-request state.
//! It is constructed once at startup and handed around as `Arc<ModelRegistry>`;
//! `select` is the only write barrier, so no caller can observe a
//! half-updated selection.

use codequill_core::error::ModelError;
use codequill_core::model::{ModelCatalog, ModelId};
use std::sync::RwLock;
use tracing::info;

/// Conservative default bound on generated tokens.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 500;

/// Mutable session state behind the lock.
struct SessionState {
    current: ModelId,
    max_output_tokens: u32,
}

/// The fixed catalog plus the current selection.
pub struct ModelRegistry {
    catalog: ModelCatalog,
    state: RwLock<SessionState>,
}

impl ModelRegistry {
    /// Create a registry; the current model defaults to catalog index 0.
    pub fn new(catalog: ModelCatalog) -> Self {
        Self::with_max_tokens(catalog, DEFAULT_MAX_OUTPUT_TOKENS)
    }

    /// Create a registry with an explicit output-token bound.
    pub fn with_max_tokens(catalog: ModelCatalog, max_output_tokens: u32) -> Self {
        let current = catalog.default_model().clone();
        Self {
            catalog,
            state: RwLock::new(SessionState {
                current,
                max_output_tokens,
            }),
        }
    }

    /// The fixed catalog, insertion order preserved.
    pub fn list(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// The currently selected model.
    pub fn current(&self) -> ModelId {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .current
            .clone()
    }

    /// Select a model. Succeeds only for catalog members; on rejection the
    /// current selection is left untouched.
    pub fn select(&self, id: &ModelId) -> Result<(), ModelError> {
        if !self.catalog.contains(id) {
            return Err(ModelError::InvalidModel(id.clone()));
        }
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.current = id.clone();
        info!(model = %id, "Model selected");
        Ok(())
    }

    /// The current max-output-tokens bound.
    pub fn max_output_tokens(&self) -> u32 {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .max_output_tokens
    }

    /// Adjust the max-output-tokens bound.
    pub fn set_max_tokens(&self, max_output_tokens: u32) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.max_output_tokens = max_output_tokens;
    }
}
