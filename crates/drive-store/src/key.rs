//! Blob key validation and public URL construction.
//!
//! Keys are `/`-separated paths relative to the bucket root. Both backends
//! apply the same rules so a key accepted in tests is accepted on disk.

use url::Url;

use crate::error::{StoreError, StoreResult};

/// Reject keys that could escape the bucket or address a directory.
pub fn validate_key(key: &str) -> StoreResult<()> {
    let invalid = |reason: &str| StoreError::InvalidKey {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    if key.is_empty() {
        return Err(invalid("key is empty"));
    }
    if key.starts_with('/') {
        return Err(invalid("key must be relative"));
    }
    if key.contains('\0') {
        return Err(invalid("key contains a NUL byte"));
    }
    for segment in key.split('/') {
        match segment {
            "" => return Err(invalid("key contains an empty segment")),
            "." | ".." => return Err(invalid("key contains a relative segment")),
            _ => {}
        }
    }
    Ok(())
}

/// Parse and check a public base URL once, at backend construction.
pub fn parse_base_url(base: &str) -> StoreResult<Url> {
    let url = Url::parse(base).map_err(|e| StoreError::InvalidBaseUrl(format!("{base}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(StoreError::InvalidBaseUrl(base.to_string()));
    }
    Ok(url)
}

/// `{base}/{bucket}/{key}` with every segment percent-encoded.
pub fn public_url(base: &Url, bucket: &str, key: &str) -> StoreResult<String> {
    validate_key(key)?;
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| StoreError::InvalidBaseUrl(base.to_string()))?
        .pop_if_empty()
        .push(bucket)
        .extend(key.split('/'));
    Ok(url.into())
}
