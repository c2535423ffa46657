use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use drive_catalog::CatalogError;
use drive_store::StoreError;
use drive_types::{format_file_size, BYTES_PER_MB};

/// Which backing store an operation failed against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Blob,
    Catalog,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blob => write!(f, "blob"),
            Self::Catalog => write!(f, "catalog"),
        }
    }
}

/// A failure reported by either backing store, kept as a readable message.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind} store error: {message}")]
pub struct StoreFailure {
    pub kind: StoreKind,
    pub message: String,
}

impl StoreFailure {
    pub fn blob(message: impl Into<String>) -> Self {
        Self {
            kind: StoreKind::Blob,
            message: message.into(),
        }
    }

    pub fn catalog(message: impl Into<String>) -> Self {
        Self {
            kind: StoreKind::Catalog,
            message: message.into(),
        }
    }
}

impl From<StoreError> for StoreFailure {
    fn from(e: StoreError) -> Self {
        Self::blob(e.to_string())
    }
}

impl From<CatalogError> for StoreFailure {
    fn from(e: CatalogError) -> Self {
        Self::catalog(e.to_string())
    }
}

/// Whole mebibyte limits read as `10 MB`; anything else falls back to the
/// human-readable size.
fn limit_label(bytes: &u64) -> String {
    if *bytes >= BYTES_PER_MB && *bytes % BYTES_PER_MB == 0 {
        format!("{} MB", bytes / BYTES_PER_MB)
    } else {
        format_file_size(*bytes)
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    /// Rejected before any store was touched.
    #[error("file size exceeds {} limit", limit_label(.limit))]
    FileTooLarge { size: u64, limit: u64 },

    #[error(transparent)]
    Store(#[from] StoreFailure),
}

#[derive(Debug, Error)]
pub enum DeleteError {
    #[error(transparent)]
    Store(#[from] StoreFailure),
}

/// Missing or unusable startup settings. Fatal to process startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0} must be set")]
    MissingVar(&'static str),

    #[error("invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },

    #[error("cannot load credentials from {path}: {reason}")]
    Credentials { path: String, reason: String },

    #[error("cannot open storage backend: {0}")]
    Backend(String),
}
