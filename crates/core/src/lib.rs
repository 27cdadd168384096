//! # CodeQuill Core
//!
//! Domain types, traits, and error definitions for the CodeQuill assistant.
//! This crate has **zero framework dependencies** — it defines the domain
//! model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Seams are traits defined here (`SearchBackend`), implementations live in
//! their respective crates. All crates depend inward on core, which keeps
//! the dependency graph clean and lets tests swap in mock implementations.

pub mod error;
pub mod model;
pub mod prompt;
pub mod response;
pub mod search;

// Re-export key types at crate root for ergonomics
pub use error::{MediaError, ModelError, SearchError};
pub use model::{ModelCatalog, ModelId};
pub use prompt::{ImagePayload, Prompt};
pub use response::{FailureKind, GatewayResponse, Outcome};
pub use search::{SearchBackend, SearchResult};
