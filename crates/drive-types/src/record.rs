use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::naming;

/// Metadata for one uploaded blob, before the catalog assigns an id.
///
/// Built once by the catalog service at upload time and never mutated
/// afterwards; there is no rename or replace operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Name supplied by the uploader, unvalidated.
    pub original_name: String,
    /// `"{timestamp}_{original_name}"`, the last segment of `storage_path`.
    pub stored_name: String,
    /// Exact byte length of the content written to the blob store.
    pub size_bytes: u64,
    /// `size_bytes` in MiB, rounded to two places. Display only.
    pub size_mb: f64,
    /// Content type declared by the uploader, not verified.
    pub mime_type: Option<String>,
    /// Blob key, `"uploads/{stored_name}"`.
    pub storage_path: String,
    /// Public, unauthenticated link to the blob.
    pub download_url: String,
    /// Server time at which the blob and its metadata were written.
    pub uploaded_at: DateTime<Utc>,
    /// Final dot-segment of `original_name` (with the dot), possibly empty.
    pub file_extension: String,
}

impl FileMetadata {
    /// Derive every field of an upload from its raw inputs.
    pub fn new(
        original_name: &str,
        size_bytes: u64,
        mime_type: Option<&str>,
        download_url: impl Into<String>,
        uploaded_at: DateTime<Utc>,
    ) -> Self {
        let stored_name = naming::stored_name(&uploaded_at, original_name);
        Self {
            original_name: original_name.to_string(),
            storage_path: naming::storage_path(&stored_name),
            stored_name,
            size_bytes,
            size_mb: naming::size_mb(size_bytes),
            mime_type: mime_type.map(str::to_string),
            download_url: download_url.into(),
            uploaded_at,
            file_extension: naming::file_extension(original_name),
        }
    }

    /// Attach the id assigned by the catalog store.
    pub fn into_record(self, id: impl Into<String>) -> FileRecord {
        FileRecord {
            id: id.into(),
            original_name: self.original_name,
            stored_name: self.stored_name,
            size_bytes: self.size_bytes,
            size_mb: self.size_mb,
            mime_type: self.mime_type,
            storage_path: self.storage_path,
            download_url: self.download_url,
            uploaded_at: self.uploaded_at,
            file_extension: self.file_extension,
        }
    }
}

/// A catalog entry: one uploaded blob and its metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Opaque id assigned by the catalog store; never reused.
    pub id: String,
    pub original_name: String,
    pub stored_name: String,
    pub size_bytes: u64,
    pub size_mb: f64,
    pub mime_type: Option<String>,
    pub storage_path: String,
    pub download_url: String,
    pub uploaded_at: DateTime<Utc>,
    pub file_extension: String,
}

impl FileRecord {
    /// Drop the id, recovering the metadata as written by the service.
    pub fn metadata(&self) -> FileMetadata {
        FileMetadata {
            original_name: self.original_name.clone(),
            stored_name: self.stored_name.clone(),
            size_bytes: self.size_bytes,
            size_mb: self.size_mb,
            mime_type: self.mime_type.clone(),
            storage_path: self.storage_path.clone(),
            download_url: self.download_url.clone(),
            uploaded_at: self.uploaded_at,
            file_extension: self.file_extension.clone(),
        }
    }

    /// MIME type for display, `"Unknown"` when none was declared.
    pub fn mime_type_or_unknown(&self) -> &str {
        self.mime_type.as_deref().unwrap_or("Unknown")
    }
}
