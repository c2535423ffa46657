//! The [`CatalogStore`] trait defining the metadata storage interface.
//!
//! Any backend (in-memory, file, database) implements this trait to hold the
//! file records of one or more named collections.

use drive_types::{FileMetadata, FileRecord};

use crate::error::Result;
use crate::query::OrderBy;

/// Storage backend for file records.
///
/// Implementations must be thread-safe (`Send + Sync`) and provide atomic
/// per-document insert and delete. There are no multi-document transactions
/// and no in-place updates.
pub trait CatalogStore: Send + Sync {
    /// Insert a new document and return the id the store assigned to it.
    ///
    /// Ids are unique within the collection and never reused.
    fn insert(&self, collection: &str, metadata: &FileMetadata) -> Result<String>;

    /// Every document in the collection, in the requested order.
    ///
    /// An unknown collection lists as empty.
    fn list(&self, collection: &str, order: OrderBy) -> Result<Vec<FileRecord>>;

    /// Delete a document by id.
    ///
    /// Fails with `NotFound` if no such document exists.
    fn delete(&self, collection: &str, id: &str) -> Result<()>;

    /// Look up one document by id.
    ///
    /// Returns `Ok(None)` if it does not exist.
    fn get(&self, collection: &str, id: &str) -> Result<Option<FileRecord>> {
        Ok(self
            .list(collection, OrderBy::default())?
            .into_iter()
            .find(|r| r.id == id))
    }
}
