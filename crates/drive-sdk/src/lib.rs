//! Catalog service for Mini Cloud-Drive.
//!
//! [`CatalogService`] is the only writer of the blob store and the metadata
//! catalog: it uploads, lists, deletes and summarizes files while keeping the
//! two stores consistent through write ordering. [`Bootstrap`] builds the
//! process-wide [`DriveContext`] once from [`DriveConfig`].
//!
//! ```no_run
//! use drive_sdk::Bootstrap;
//!
//! static DRIVE: Bootstrap = Bootstrap::new();
//!
//! let ctx = DRIVE.from_env()?;
//! let record = ctx.service().upload(b"hello", "a.txt", Some("text/plain"))?;
//! println!("{}", record.download_url);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod service;

pub use bootstrap::{Bootstrap, DriveContext};
pub use config::{Credentials, DriveConfig};
pub use error::{ConfigError, DeleteError, StoreFailure, StoreKind, UploadError};
pub use service::CatalogService;

// Re-export key types
pub use drive_catalog::{CatalogStore, InMemoryCatalogStore, JsonFileCatalogStore, OrderBy};
pub use drive_store::{BlobStore, FsBlobStore, InMemoryBlobStore, StoredBlob};
pub use drive_types::{format_file_size, CatalogStats, Clock, FileRecord, ManualClock};
