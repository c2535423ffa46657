//! JSON-file catalog store.
//!
//! Each collection is one JSON document at `{dir}/{collection}.json`. Every
//! write rewrites the whole document through a temporary file and a rename,
//! so readers never observe a half-written collection.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use uuid::Uuid;

use drive_types::{FileMetadata, FileRecord};

use crate::error::{CatalogError, Result};
use crate::query::{validate_collection, OrderBy};
use crate::traits::CatalogStore;

#[derive(Debug, Default, Serialize, Deserialize)]
struct CollectionFile {
    next_seq: u64,
    documents: Vec<Document>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    seq: u64,
    record: FileRecord,
}

/// A [`CatalogStore`] persisted as one JSON file per collection.
///
/// Writers within the process are serialized by a mutex.
#[derive(Debug)]
pub struct JsonFileCatalogStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileCatalogStore {
    /// Open (creating if needed) the catalog directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    fn path(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{collection}.json"))
    }

    fn load(&self, collection: &str) -> Result<CollectionFile> {
        match fs::read(self.path(collection)) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| CatalogError::Serialization(e.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(CollectionFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, collection: &str, file: &CollectionFile) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(file)
            .map_err(|e| CatalogError::Serialization(e.to_string()))?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path(collection))
            .map_err(|e| CatalogError::Io(e.error))?;
        Ok(())
    }
}

impl CatalogStore for JsonFileCatalogStore {
    fn insert(&self, collection: &str, metadata: &FileMetadata) -> Result<String> {
        validate_collection(collection)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| CatalogError::Backend(format!("lock poisoned: {e}")))?;

        let mut file = self.load(collection)?;
        let id = Uuid::now_v7().to_string();
        let seq = file.next_seq;
        file.next_seq += 1;
        file.documents.push(Document {
            seq,
            record: metadata.clone().into_record(id.clone()),
        });
        self.save(collection, &file)?;
        tracing::debug!(collection, id = %id, "inserted document");
        Ok(id)
    }

    fn list(&self, collection: &str, order: OrderBy) -> Result<Vec<FileRecord>> {
        validate_collection(collection)?;
        let file = self.load(collection)?;
        let mut docs: Vec<(u64, FileRecord)> = file
            .documents
            .into_iter()
            .map(|d| (d.seq, d.record))
            .collect();
        order.sort(&mut docs);
        Ok(docs.into_iter().map(|(_, r)| r).collect())
    }

    fn delete(&self, collection: &str, id: &str) -> Result<()> {
        validate_collection(collection)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| CatalogError::Backend(format!("lock poisoned: {e}")))?;

        let mut file = self.load(collection)?;
        let before = file.documents.len();
        file.documents.retain(|d| d.record.id != id);
        if file.documents.len() == before {
            return Err(CatalogError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        self.save(collection, &file)?;
        tracing::debug!(collection, id, "deleted document");
        Ok(())
    }
}
