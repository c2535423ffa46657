//! Blob storage for Mini Cloud-Drive.
//!
//! This crate implements the key-addressed object store that holds uploaded
//! file contents. Every blob lives at a `/`-separated key inside a named
//! bucket and can be granted public read access, after which it is reachable
//! at a permanent URL.
//!
//! # Storage Backends
//!
//! All backends implement the [`BlobStore`] trait:
//!
//! - [`InMemoryBlobStore`] -- map-based store for tests and embedding
//! - [`FsBlobStore`] -- a bucket directory on local disk
//!
//! # Design Rules
//!
//! 1. Keys never escape the bucket: empty, `.` and `..` segments are rejected.
//! 2. Writes replace whole blobs; there are no partial or appending writes.
//! 3. Deleting or publishing an absent blob is an error, never a no-op.
//! 4. The store never interprets blob contents.

pub mod error;
pub mod fs;
pub mod key;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use fs::FsBlobStore;
pub use key::{parse_base_url, public_url, validate_key};
pub use memory::InMemoryBlobStore;
pub use traits::{BlobStore, StoredBlob};
