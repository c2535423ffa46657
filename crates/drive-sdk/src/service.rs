use std::collections::HashSet;
use std::sync::Arc;

use drive_catalog::{CatalogStore, OrderBy};
use drive_store::{BlobStore, StoreError};
use drive_types::{
    naming, CatalogStats, Clock, FileMetadata, FileRecord, SystemClock, BYTES_PER_MB,
    UPLOAD_PREFIX,
};

use crate::config::{DEFAULT_COLLECTION, DEFAULT_MAX_FILE_SIZE_MB};
use crate::error::{DeleteError, StoreFailure, UploadError};

/// The file catalog: sole writer of both the blob store and the catalog store.
///
/// Every blob under `uploads/` is meant to have exactly one catalog record and
/// every record exactly one blob. There is no transaction spanning the two
/// stores, so the service relies on ordering instead:
///
/// - upload writes the blob before the record, so a failed insert leaves at
///   worst an unindexed blob, never a record with a broken link;
/// - delete removes the blob before the record, and keeps the record whenever
///   the blob could not be removed.
///
/// Nothing is retried. Reads ([`list`](Self::list), [`stats`](Self::stats))
/// degrade to empty results when a store fails.
pub struct CatalogService {
    blobs: Arc<dyn BlobStore>,
    catalog: Arc<dyn CatalogStore>,
    clock: Arc<dyn Clock>,
    collection: String,
    max_file_size_bytes: u64,
}

impl CatalogService {
    pub fn new(blobs: Arc<dyn BlobStore>, catalog: Arc<dyn CatalogStore>) -> Self {
        Self {
            blobs,
            catalog,
            clock: Arc::new(SystemClock),
            collection: DEFAULT_COLLECTION.to_string(),
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_MB * BYTES_PER_MB,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size_bytes = bytes;
        self
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_bytes
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The blob store, for serving downloads.
    pub fn blobs(&self) -> &dyn BlobStore {
        self.blobs.as_ref()
    }

    // ---- Writes ----

    /// Store `content` as a new blob and index it.
    ///
    /// `declared_mime_type` is recorded as given. The record's size is always
    /// the length of `content`.
    pub fn upload(
        &self,
        content: &[u8],
        original_name: &str,
        declared_mime_type: Option<&str>,
    ) -> Result<FileRecord, UploadError> {
        let size = content.len() as u64;
        if size > self.max_file_size_bytes {
            return Err(UploadError::FileTooLarge {
                size,
                limit: self.max_file_size_bytes,
            });
        }

        let now = self.clock.now();
        let stored_name = naming::stored_name(&now, original_name);
        let key = naming::storage_path(&stored_name);

        // Two uploads of one name within the same second share a key.
        if self.blobs.exists(&key).map_err(StoreFailure::from)? {
            return Err(StoreFailure::from(StoreError::AlreadyExists(key)).into());
        }
        self.blobs
            .put(&key, content, declared_mime_type)
            .map_err(StoreFailure::from)?;
        self.blobs.make_public(&key).map_err(StoreFailure::from)?;
        let download_url = self.blobs.public_url(&key).map_err(StoreFailure::from)?;

        let metadata =
            FileMetadata::new(original_name, size, declared_mime_type, download_url, now);
        debug_assert_eq!(metadata.storage_path, key);

        let id = self
            .catalog
            .insert(&self.collection, &metadata)
            .map_err(|e| {
                tracing::warn!(key = %key, error = %e, "catalog insert failed; blob left unindexed");
                StoreFailure::from(e)
            })?;

        tracing::info!(id = %id, key = %key, size, "uploaded file");
        Ok(metadata.into_record(id))
    }

    /// Remove the blob at `storage_path`, then the record `id`.
    ///
    /// The pair is trusted as given; nothing checks that the record actually
    /// points at that blob.
    pub fn delete(&self, id: &str, storage_path: &str) -> Result<(), DeleteError> {
        self.blobs.delete(storage_path).map_err(|e| {
            tracing::warn!(id, storage_path, error = %e, "blob delete failed; record kept");
            StoreFailure::from(e)
        })?;
        self.catalog
            .delete(&self.collection, id)
            .map_err(StoreFailure::from)?;
        tracing::info!(id, storage_path, "deleted file");
        Ok(())
    }

    // ---- Reads ----

    /// Every record, newest upload first. Empty if the catalog is unreachable.
    pub fn list(&self) -> Vec<FileRecord> {
        self.try_list().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "error retrieving files");
            Vec::new()
        })
    }

    /// Like [`list`](Self::list), but reports catalog failures.
    pub fn try_list(&self) -> Result<Vec<FileRecord>, StoreFailure> {
        Ok(self.catalog.list(&self.collection, OrderBy::newest_first())?)
    }

    /// One record by id. `None` if absent or the catalog is unreachable.
    pub fn find(&self, id: &str) -> Option<FileRecord> {
        self.catalog
            .get(&self.collection, id)
            .unwrap_or_else(|e| {
                tracing::warn!(id, error = %e, "error retrieving file");
                None
            })
    }

    /// Totals over the current listing, recomputed on every call.
    pub fn stats(&self) -> CatalogStats {
        CatalogStats::from_records(&self.list())
    }

    // ---- Reconciliation ----
    //
    // Extension point for a repair sweep. These only report; nothing here
    // deletes or re-indexes.

    /// Blob keys under `uploads/` that no record points at.
    pub fn find_orphan_blobs(&self) -> Result<Vec<String>, StoreFailure> {
        let indexed: HashSet<String> = self
            .try_list()?
            .into_iter()
            .map(|r| r.storage_path)
            .collect();
        Ok(self
            .blobs
            .list_keys(UPLOAD_PREFIX)?
            .into_iter()
            .filter(|key| !indexed.contains(key))
            .collect())
    }

    /// Records whose blob is missing.
    pub fn find_dangling_records(&self) -> Result<Vec<FileRecord>, StoreFailure> {
        let mut dangling = Vec::new();
        for record in self.try_list()? {
            if !self.blobs.exists(&record.storage_path)? {
                dangling.push(record);
            }
        }
        Ok(dangling)
    }
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("bucket", &self.blobs.bucket())
            .field("collection", &self.collection)
            .field("max_file_size_bytes", &self.max_file_size_bytes)
            .finish()
    }
}
