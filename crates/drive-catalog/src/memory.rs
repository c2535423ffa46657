//! In-memory catalog store for testing and ephemeral use.
//!
//! [`InMemoryCatalogStore`] keeps every collection in a `HashMap` protected by
//! a `RwLock`. Data is lost when the store is dropped.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use drive_types::{FileMetadata, FileRecord};

use crate::error::{CatalogError, Result};
use crate::query::{validate_collection, OrderBy};
use crate::traits::CatalogStore;

#[derive(Debug, Default)]
struct Collection {
    next_seq: u64,
    docs: HashMap<String, (u64, FileRecord)>,
}

/// An in-memory implementation of [`CatalogStore`].
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryCatalogStore {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .expect("lock poisoned")
            .get(collection)
            .map_or(0, |c| c.docs.len())
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn insert(&self, collection: &str, metadata: &FileMetadata) -> Result<String> {
        validate_collection(collection)?;
        let mut collections = self.collections.write().map_err(|e| {
            CatalogError::Backend(format!("lock poisoned: {e}"))
        })?;
        let coll = collections.entry(collection.to_string()).or_default();

        let id = Uuid::now_v7().to_string();
        let seq = coll.next_seq;
        coll.next_seq += 1;
        coll.docs
            .insert(id.clone(), (seq, metadata.clone().into_record(id.clone())));
        Ok(id)
    }

    fn list(&self, collection: &str, order: OrderBy) -> Result<Vec<FileRecord>> {
        validate_collection(collection)?;
        let collections = self.collections.read().map_err(|e| {
            CatalogError::Backend(format!("lock poisoned: {e}"))
        })?;
        let Some(coll) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        let mut docs: Vec<(u64, FileRecord)> = coll.docs.values().cloned().collect();
        order.sort(&mut docs);
        Ok(docs.into_iter().map(|(_, r)| r).collect())
    }

    fn delete(&self, collection: &str, id: &str) -> Result<()> {
        validate_collection(collection)?;
        let mut collections = self.collections.write().map_err(|e| {
            CatalogError::Backend(format!("lock poisoned: {e}"))
        })?;
        let removed = collections
            .get_mut(collection)
            .and_then(|c| c.docs.remove(id));
        if removed.is_none() {
            return Err(CatalogError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<FileRecord>> {
        validate_collection(collection)?;
        let collections = self.collections.read().map_err(|e| {
            CatalogError::Backend(format!("lock poisoned: {e}"))
        })?;
        Ok(collections
            .get(collection)
            .and_then(|c| c.docs.get(id))
            .map(|(_, r)| r.clone()))
    }
}
