use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use url::Url;

use crate::error::{StoreError, StoreResult};
use crate::key::{parse_base_url, public_url, validate_key};
use crate::traits::{BlobStore, StoredBlob};

/// In-memory, map-based blob store.
///
/// Intended for tests and embedding. Blobs and the public-access set are held
/// behind `RwLock`s for safe concurrent access. Blobs are cloned on read.
pub struct InMemoryBlobStore {
    bucket: String,
    base_url: Url,
    blobs: RwLock<BTreeMap<String, StoredBlob>>,
    public: RwLock<BTreeSet<String>>,
}

impl InMemoryBlobStore {
    /// Public URLs issued by this constructor point at a placeholder host.
    pub const DEFAULT_BASE_URL: &'static str = "https://blobs.invalid";

    /// Create an empty store bound to `bucket`.
    pub fn new(bucket: impl Into<String>) -> Self {
        let base_url = Url::parse(Self::DEFAULT_BASE_URL).expect("static URL is valid");
        Self::with_base(bucket, base_url)
    }

    /// Create an empty store that issues URLs under `base_url`.
    pub fn with_base_url(bucket: impl Into<String>, base_url: &str) -> StoreResult<Self> {
        Ok(Self::with_base(bucket, parse_base_url(base_url)?))
    }

    fn with_base(bucket: impl Into<String>, base_url: Url) -> Self {
        Self {
            bucket: bucket.into(),
            base_url,
            blobs: RwLock::new(BTreeMap::new()),
            public: RwLock::new(BTreeSet::new()),
        }
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored blobs.
    pub fn total_bytes(&self) -> u64 {
        self.blobs
            .read()
            .expect("lock poisoned")
            .values()
            .map(StoredBlob::size)
            .sum()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn put(&self, key: &str, content: &[u8], content_type: Option<&str>) -> StoreResult<()> {
        validate_key(key)?;
        let blob = StoredBlob::new(content.to_vec(), content_type.map(str::to_string));
        let mut blobs = self
            .blobs
            .write()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        blobs.insert(key.to_string(), blob);
        drop(blobs);
        // A fresh write starts private.
        self.public
            .write()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?
            .remove(key);
        Ok(())
    }

    fn read(&self, key: &str) -> StoreResult<Option<StoredBlob>> {
        let blobs = self
            .blobs
            .read()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        Ok(blobs.get(key).cloned())
    }

    fn make_public(&self, key: &str) -> StoreResult<()> {
        if !self.exists(key)? {
            return Err(StoreError::NotFound(key.to_string()));
        }
        let mut public = self
            .public
            .write()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        public.insert(key.to_string());
        Ok(())
    }

    fn is_public(&self, key: &str) -> StoreResult<bool> {
        let public = self
            .public
            .read()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        Ok(public.contains(key))
    }

    fn public_url(&self, key: &str) -> StoreResult<String> {
        public_url(&self.base_url, &self.bucket, key)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        if blobs.remove(key).is_none() {
            return Err(StoreError::NotFound(key.to_string()));
        }
        drop(blobs);
        if let Ok(mut public) = self.public.write() {
            public.remove(key);
        }
        Ok(())
    }

    fn list_keys(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let blobs = self
            .blobs
            .read()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        Ok(blobs
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("bucket", &self.bucket)
            .field("blob_count", &self.len())
            .finish()
    }
}
