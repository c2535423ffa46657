//! Metadata catalog for Mini Cloud-Drive.
//!
//! This crate stores [`drive_types::FileRecord`] documents in named
//! collections. The store assigns each document its id on insert and answers
//! ordered listings; documents are never updated in place.
//!
//! # Modules
//!
//! - [`error`]: Error types for catalog operations
//! - [`query`]: Listing order: [`OrderBy`], [`SortField`], [`Direction`]
//! - [`traits`]: The [`CatalogStore`] trait defining the storage interface
//! - [`memory`]: In-memory [`InMemoryCatalogStore`] for tests
//! - [`file`]: [`JsonFileCatalogStore`], one JSON document per collection

pub mod error;
pub mod file;
pub mod memory;
pub mod query;
pub mod traits;

pub use error::{CatalogError, Result};
pub use file::JsonFileCatalogStore;
pub use memory::InMemoryCatalogStore;
pub use query::{validate_collection, Direction, OrderBy, SortField};
pub use traits::CatalogStore;
