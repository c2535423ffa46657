use crate::error::StoreResult;

/// Content and content type of one stored blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredBlob {
    /// The raw bytes, exactly as written.
    pub data: Vec<u8>,
    /// Content type the writer tagged the blob with, if any.
    pub content_type: Option<String>,
}

impl StoredBlob {
    pub fn new(data: Vec<u8>, content_type: Option<String>) -> Self {
        Self { data, content_type }
    }

    /// Size of `data` in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Key-addressed binary object store with public-URL issuance.
///
/// All implementations must satisfy these invariants:
/// - Keys are validated with [`crate::validate_key`] before any write.
/// - `put` replaces an existing blob at the same key.
/// - `delete` and `make_public` fail with `NotFound` for absent keys.
/// - Only blobs granted by `make_public` are served at their public URL.
/// - The store never interprets blob contents.
pub trait BlobStore: Send + Sync {
    /// Name of the bucket this store is bound to.
    fn bucket(&self) -> &str;

    /// Write `content` at `key`, tagged with `content_type` when given.
    fn put(&self, key: &str, content: &[u8], content_type: Option<&str>) -> StoreResult<()>;

    /// Read the blob at `key`.
    ///
    /// Returns `Ok(None)` if no blob exists there.
    fn read(&self, key: &str) -> StoreResult<Option<StoredBlob>>;

    /// Grant unauthenticated read access to the blob at `key`.
    fn make_public(&self, key: &str) -> StoreResult<()>;

    /// Whether `make_public` has been granted for `key`.
    ///
    /// Absent blobs are never public.
    fn is_public(&self, key: &str) -> StoreResult<bool>;

    /// Permanent public URL for `key`.
    fn public_url(&self, key: &str) -> StoreResult<String>;

    /// Remove the blob at `key`.
    fn delete(&self, key: &str) -> StoreResult<()>;

    /// All keys starting with `prefix`, sorted.
    fn list_keys(&self, prefix: &str) -> StoreResult<Vec<String>>;

    /// Check whether a blob exists at `key`.
    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.read(key)?.is_some())
    }
}
