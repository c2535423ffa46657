//! Derivation rules for stored names, storage paths, and size figures.

use chrono::{DateTime, Utc};

/// Key prefix under which every uploaded blob lives.
pub const UPLOAD_PREFIX: &str = "uploads/";

/// Bytes in one mebibyte, the unit behind every `size_mb` figure.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Timestamp layout used as the stored-name prefix (second precision).
const STORED_NAME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Build the stored name `"{timestamp}_{original_name}"`.
///
/// The original name is used verbatim; it is never sanitized here.
pub fn stored_name(at: &DateTime<Utc>, original_name: &str) -> String {
    format!("{}_{original_name}", at.format(STORED_NAME_FORMAT))
}

/// Build the blob key for a stored name.
pub fn storage_path(stored_name: &str) -> String {
    format!("{UPLOAD_PREFIX}{stored_name}")
}

/// Extension of `name` including the leading dot, or an empty string.
///
/// Only the final path segment is inspected. Leading dots are not treated as
/// an extension separator, so `.bashrc` has no extension while
/// `archive.tar.gz` yields `.gz`.
pub fn file_extension(name: &str) -> String {
    let base = name.rsplit('/').next().unwrap_or(name);
    let Some(dot) = base.rfind('.') else {
        return String::new();
    };
    if base[..dot].chars().all(|c| c == '.') {
        return String::new();
    }
    base[dot..].to_string()
}

/// Size in mebibytes rounded to two decimal places, ties to even.
///
/// Rounding works on the exact quotient, so a size landing on a half
/// hundredth (131072 bytes is exactly 0.125 MB) goes to the even neighbour.
pub fn size_mb(size_bytes: u64) -> f64 {
    let scaled = u128::from(size_bytes) * 100;
    let divisor = u128::from(BYTES_PER_MB);
    let mut hundredths = scaled / divisor;
    let twice_rem = (scaled % divisor) * 2;
    if twice_rem > divisor || (twice_rem == divisor && hundredths % 2 == 1) {
        hundredths += 1;
    }
    hundredths as f64 / 100.0
}

/// Human-readable size: bytes below 1 KiB, then KB and MB with two decimals.
pub fn format_file_size(size_bytes: u64) -> String {
    if size_bytes < 1024 {
        format!("{size_bytes} B")
    } else if size_bytes < BYTES_PER_MB {
        format!("{:.2} KB", size_bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MB", size_bytes as f64 / BYTES_PER_MB as f64)
    }
}
