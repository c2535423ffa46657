//! Foundation types for Mini Cloud-Drive.
//!
//! This crate provides the record, naming, and temporal types shared by the
//! blob store, the catalog store, the catalog service, and the presentation
//! layers. Every other drive crate depends on `drive-types`.
//!
//! # Key Types
//!
//! - [`FileRecord`]: One catalog entry describing an uploaded blob
//! - [`FileMetadata`]: A record before the catalog store assigns its id
//! - [`CatalogStats`]: Aggregate counts over the catalog
//! - [`Clock`]: Source of upload timestamps ([`SystemClock`] in production,
//!   [`ManualClock`] in tests)
//!
//! # Naming
//!
//! The [`naming`] module derives stored names, storage paths, extensions, and
//! megabyte figures from an upload's raw inputs.

pub mod naming;
pub mod record;
pub mod stats;
pub mod temporal;

pub use naming::{
    file_extension, format_file_size, size_mb, storage_path, stored_name, BYTES_PER_MB,
    UPLOAD_PREFIX,
};
pub use record::{FileMetadata, FileRecord};
pub use stats::CatalogStats;
pub use temporal::{Clock, ManualClock, SystemClock};
