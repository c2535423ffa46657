/// Errors from blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No blob exists at the requested key.
    #[error("blob not found: {0}")]
    NotFound(String),

    /// A blob already exists at the key and the caller asked not to replace it.
    #[error("blob already exists: {0}")]
    AlreadyExists(String),

    /// The key cannot address a blob (empty, absolute, or traversing segments).
    #[error("invalid blob key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// The configured public base URL cannot carry path segments.
    #[error("invalid public base URL: {0}")]
    InvalidBaseUrl(String),

    /// Sidecar metadata could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend state is unusable (e.g. a poisoned lock).
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result alias for blob store operations.
pub type StoreResult<T> = Result<T, StoreError>;
