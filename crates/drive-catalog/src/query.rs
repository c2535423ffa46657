//! Ordering for catalog listings.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use drive_types::FileRecord;

use crate::error::{CatalogError, Result};

/// Record field a listing can be ordered by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    UploadedAt,
    OriginalName,
    SizeBytes,
}

/// Sort direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Ascending,
    Descending,
}

/// A listing order: one field plus a direction.
///
/// Ties on the field are broken by insertion order, following the direction:
/// ascending puts the earlier insert first, descending the later one. The
/// result is deterministic for a given store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: SortField,
    pub direction: Direction,
}

impl OrderBy {
    pub fn new(field: SortField, direction: Direction) -> Self {
        Self { field, direction }
    }

    /// Most recent upload first.
    pub fn newest_first() -> Self {
        Self::new(SortField::UploadedAt, Direction::Descending)
    }

    fn compare_field(&self, a: &FileRecord, b: &FileRecord) -> Ordering {
        match self.field {
            SortField::UploadedAt => a.uploaded_at.cmp(&b.uploaded_at),
            SortField::OriginalName => a.original_name.cmp(&b.original_name),
            SortField::SizeBytes => a.size_bytes.cmp(&b.size_bytes),
        }
    }

    /// Sort `(insertion_seq, record)` pairs in place.
    pub(crate) fn sort(&self, docs: &mut [(u64, FileRecord)]) {
        docs.sort_by(|(seq_a, a), (seq_b, b)| {
            let ord = self.compare_field(a, b).then(seq_a.cmp(seq_b));
            match self.direction {
                Direction::Ascending => ord,
                Direction::Descending => ord.reverse(),
            }
        });
    }
}

impl Default for OrderBy {
    fn default() -> Self {
        Self::newest_first()
    }
}

/// Collection names become file names, so keep them to a safe alphabet.
pub fn validate_collection(name: &str) -> Result<()> {
    let invalid = |reason: &str| CatalogError::InvalidCollection {
        name: name.to_string(),
        reason: reason.to_string(),
    };
    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(invalid("only ASCII letters, digits, '_' and '-' are allowed"));
    }
    Ok(())
}
