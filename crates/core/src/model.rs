//! Model identity and catalog types.
//!
//! The catalog is the fixed universe of selectable remote models. It is
//! built once at process start and never changes; its order matters —
//! index 0 is the default selection.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// Opaque identifier for a remote model, provider-qualified
/// (e.g. `openai/gpt-4`, `mistralai/mistral-7b-instruct:free`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ModelId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// The ordered, immutable set of selectable models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCatalog {
    models: Vec<ModelId>,
}

impl ModelCatalog {
    /// Build a catalog from an ordered list of model ids.
    ///
    /// Fails on an empty list — a catalog without a default model is
    /// unusable.
    pub fn new(models: Vec<ModelId>) -> Result<Self, ModelError> {
        if models.is_empty() {
            return Err(ModelError::EmptyCatalog);
        }
        Ok(Self { models })
    }

    /// The default model: index 0, by contract.
    pub fn default_model(&self) -> &ModelId {
        &self.models[0]
    }

    pub fn contains(&self, id: &ModelId) -> bool {
        self.models.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelId> {
        self.models.iter()
    }

    pub fn as_slice(&self) -> &[ModelId] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ModelCatalog {
        ModelCatalog::new(vec![ModelId::new("m1"), ModelId::new("m2")]).unwrap()
    }

    #[test]
    fn first_entry_is_the_default() {
        assert_eq!(catalog().default_model().as_str(), "m1");
    }

    #[test]
    fn membership_check() {
        let cat = catalog();
        assert!(cat.contains(&ModelId::new("m2")));
        assert!(!cat.contains(&ModelId::new("m3")));
    }

    #[test]
    fn empty_catalog_rejected() {
        assert_eq!(ModelCatalog::new(vec![]), Err(ModelError::EmptyCatalog));
    }

    #[test]
    fn order_is_preserved() {
        let cat = catalog();
        let ids: Vec<&str> = cat.iter().map(|m| m.as_str()).collect();
        assert_eq!(ids, ["m1", "m2"]);
    }
}
