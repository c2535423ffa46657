//! Filesystem-backed bucket.
//!
//! Layout under `{data_root}/{bucket}/`:
//!
//! - `objects/{key}` holds the raw bytes,
//! - `meta/{key}.json` holds the content type and public flag,
//! - `tmp/` holds in-flight writes, which are renamed into place.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use url::Url;
use walkdir::WalkDir;

use crate::error::{StoreError, StoreResult};
use crate::key::{parse_base_url, public_url, validate_key};
use crate::traits::{BlobStore, StoredBlob};

#[derive(Debug, Default, Serialize, Deserialize)]
struct BlobMeta {
    content_type: Option<String>,
    public: bool,
}

/// A bucket stored as a directory tree on local disk.
#[derive(Debug)]
pub struct FsBlobStore {
    bucket: String,
    base_url: Url,
    root: PathBuf,
}

impl FsBlobStore {
    /// Open (creating if needed) the bucket directory `{data_root}/{bucket}`.
    pub fn open(
        data_root: impl AsRef<Path>,
        bucket: impl Into<String>,
        base_url: &str,
    ) -> StoreResult<Self> {
        let bucket = bucket.into();
        if bucket.contains('/') {
            return Err(StoreError::InvalidKey {
                key: bucket,
                reason: "bucket name must be a single segment".into(),
            });
        }
        validate_key(&bucket)?;

        let root = data_root.as_ref().join(&bucket);
        for dir in ["objects", "meta", "tmp"] {
            fs::create_dir_all(root.join(dir))?;
        }
        tracing::debug!(bucket = %bucket, root = %root.display(), "opened filesystem bucket");
        Ok(Self {
            bucket,
            base_url: parse_base_url(base_url)?,
            root,
        })
    }

    /// Directory holding this bucket.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.root.join("objects").join(key)
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.root.join("meta").join(format!("{key}.json"))
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut tmp = NamedTempFile::new_in(self.root.join("tmp"))?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    fn read_meta(&self, key: &str) -> StoreResult<BlobMeta> {
        match fs::read(self.meta_path(key)) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Serialization(e.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BlobMeta::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_meta(&self, key: &str, meta: &BlobMeta) -> StoreResult<()> {
        let bytes =
            serde_json::to_vec(meta).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.write_atomic(&self.meta_path(key), &bytes)
    }
}

impl BlobStore for FsBlobStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn put(&self, key: &str, content: &[u8], content_type: Option<&str>) -> StoreResult<()> {
        validate_key(key)?;
        self.write_atomic(&self.object_path(key), content)?;
        let meta = BlobMeta {
            content_type: content_type.map(str::to_string),
            public: false,
        };
        self.write_meta(key, &meta)?;
        tracing::debug!(key, size = content.len(), "wrote blob");
        Ok(())
    }

    fn read(&self, key: &str) -> StoreResult<Option<StoredBlob>> {
        validate_key(key)?;
        let data = match fs::read(self.object_path(key)) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let meta = self.read_meta(key)?;
        Ok(Some(StoredBlob::new(data, meta.content_type)))
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        validate_key(key)?;
        Ok(self.object_path(key).is_file())
    }

    fn make_public(&self, key: &str) -> StoreResult<()> {
        if !self.exists(key)? {
            return Err(StoreError::NotFound(key.to_string()));
        }
        let mut meta = self.read_meta(key)?;
        meta.public = true;
        self.write_meta(key, &meta)
    }

    fn is_public(&self, key: &str) -> StoreResult<bool> {
        if !self.exists(key)? {
            return Ok(false);
        }
        Ok(self.read_meta(key)?.public)
    }

    fn public_url(&self, key: &str) -> StoreResult<String> {
        public_url(&self.base_url, &self.bucket, key)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        validate_key(key)?;
        match fs::remove_file(self.object_path(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(key.to_string()))
            }
            Err(e) => return Err(e.into()),
        }
        match fs::remove_file(self.meta_path(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        tracing::debug!(key, "deleted blob");
        Ok(())
    }

    fn list_keys(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let objects = self.root.join("objects");
        let mut keys = Vec::new();
        for entry in WalkDir::new(&objects) {
            let entry = entry.map_err(|e| StoreError::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&objects) else {
                continue;
            };
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if key.starts_with(prefix) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}
