//! Error types for catalog operations.

use thiserror::Error;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No document with this id exists in the collection.
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// The collection name cannot be used as a storage name.
    #[error("invalid collection name: {name}: {reason}")]
    InvalidCollection { name: String, reason: String },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error during file-based catalog operations.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend state is unusable (e.g. a poisoned lock).
    #[error("backend error: {0}")]
    Backend(String),
}

/// Convenience type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
