use serde::{Deserialize, Serialize};

use crate::naming::size_mb;
use crate::record::FileRecord;

/// Aggregate figures over the whole catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_files: u64,
    pub total_size_bytes: u64,
    /// `total_size_bytes` in MiB, rounded to two places.
    pub total_size_mb: f64,
}

impl CatalogStats {
    /// Fold a listing into totals.
    pub fn from_records(records: &[FileRecord]) -> Self {
        let total_size_bytes = records.iter().map(|r| r.size_bytes).sum();
        Self {
            total_files: records.len() as u64,
            total_size_bytes,
            total_size_mb: size_mb(total_size_bytes),
        }
    }
}
