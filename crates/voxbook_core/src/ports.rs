//! crates/voxbook_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like storage
//! backends or generative-text APIs.

use crate::domain::Document;
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services
/// (filesystem, network, API quota).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// A partial update applied to one document. Fields left `None` are
/// untouched. The store applies the whole patch atomically.
#[derive(Debug, Default, Clone)]
pub struct DocumentPatch {
    /// Replaces the cached summary.
    pub summary: Option<String>,
    /// Appends one quiz text to the document's quiz history.
    pub push_quiz: Option<String>,
}

/// The document catalog. Implementations own id assignment: `insert` must
/// compute `max(existing ids) + 1` atomically with respect to concurrent
/// inserts.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a new document built from extracted text, assigning the next
    /// id and deriving the display name. Returns the stored document.
    async fn insert(&self, content: String, source_location: String) -> PortResult<Document>;

    async fn get_by_id(&self, id: u64) -> PortResult<Option<Document>>;

    /// Applies a partial update. Fails with `PortError::NotFound` when the
    /// id does not resolve.
    async fn update(&self, id: u64, patch: DocumentPatch) -> PortResult<()>;

    /// Removes one document. Returns whether anything was removed.
    async fn delete_by_id(&self, id: u64) -> PortResult<bool>;

    /// Truncates the whole catalog. Does not reset id assignment.
    async fn delete_all(&self) -> PortResult<()>;

    async fn list_all(&self) -> PortResult<Vec<Document>>;
}

/// The generative-text backend. One prompt string in, one unconstrained
/// reply string out; nondeterministic, latency-bearing, fallible, and under
/// no obligation to respect any format the prompt asked for.
#[async_trait]
pub trait GenerativeTextService: Send + Sync {
    async fn generate(&self, prompt: &str) -> PortResult<String>;
}

/// Binary-to-text extraction, treated as an opaque converter.
#[async_trait]
pub trait TextExtractionService: Send + Sync {
    async fn extract(&self, data: &[u8]) -> PortResult<String>;
}
