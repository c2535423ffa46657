use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use drive_catalog::validate_collection;
use drive_types::BYTES_PER_MB;

use crate::error::ConfigError;

pub const ENV_CREDENTIALS_PATH: &str = "DRIVE_CREDENTIALS_PATH";
pub const ENV_STORAGE_BUCKET: &str = "DRIVE_STORAGE_BUCKET";
pub const ENV_DATA_ROOT: &str = "DRIVE_DATA_ROOT";
pub const ENV_MAX_FILE_SIZE_MB: &str = "DRIVE_MAX_FILE_SIZE_MB";
pub const ENV_PUBLIC_BASE_URL: &str = "DRIVE_PUBLIC_BASE_URL";
pub const ENV_COLLECTION: &str = "DRIVE_COLLECTION";

pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 10;
pub const DEFAULT_DATA_ROOT: &str = "drive-data";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://127.0.0.1:8080/v1/blobs";
pub const DEFAULT_COLLECTION: &str = "files";

/// Everything needed to construct the stores and the catalog service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Credentials locator: a JSON file naming the project.
    pub credentials_path: PathBuf,
    /// Bucket the blob store is bound to.
    pub storage_bucket: String,
    /// Directory holding the bucket and the catalog.
    pub data_root: PathBuf,
    pub max_file_size_bytes: u64,
    /// Prefix of every public download URL.
    pub public_base_url: String,
    /// Catalog collection holding the file records.
    pub collection: String,
}

impl DriveConfig {
    /// Build a config from the two required values, defaulting the rest.
    pub fn new(credentials_path: impl Into<PathBuf>, storage_bucket: impl Into<String>) -> Self {
        Self {
            credentials_path: credentials_path.into(),
            storage_bucket: storage_bucket.into(),
            data_root: PathBuf::from(DEFAULT_DATA_ROOT),
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_MB * BYTES_PER_MB,
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }

    /// Read the process environment, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key/value source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let credentials_path =
            get(ENV_CREDENTIALS_PATH).ok_or(ConfigError::MissingVar(ENV_CREDENTIALS_PATH))?;
        let storage_bucket =
            get(ENV_STORAGE_BUCKET).ok_or(ConfigError::MissingVar(ENV_STORAGE_BUCKET))?;

        let mut config = Self::new(credentials_path, storage_bucket);
        if let Some(root) = get(ENV_DATA_ROOT) {
            config.data_root = PathBuf::from(root);
        }
        if let Some(mb) = get(ENV_MAX_FILE_SIZE_MB) {
            let mb: u64 = mb.trim().parse().map_err(|e| ConfigError::InvalidValue {
                var: ENV_MAX_FILE_SIZE_MB,
                reason: format!("{e}"),
            })?;
            if mb == 0 {
                return Err(ConfigError::InvalidValue {
                    var: ENV_MAX_FILE_SIZE_MB,
                    reason: "must be at least 1".into(),
                });
            }
            config.max_file_size_bytes = mb.checked_mul(BYTES_PER_MB).ok_or_else(|| {
                ConfigError::InvalidValue {
                    var: ENV_MAX_FILE_SIZE_MB,
                    reason: format!("{mb} MB does not fit in a byte count"),
                }
            })?;
        }
        if let Some(url) = get(ENV_PUBLIC_BASE_URL) {
            config.public_base_url = url;
        }
        if let Some(collection) = get(ENV_COLLECTION) {
            config.collection = collection;
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject values the stores would only refuse later, per request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_collection(&self.collection).map_err(|e| ConfigError::InvalidValue {
            var: ENV_COLLECTION,
            reason: e.to_string(),
        })
    }

    /// Directory of the filesystem bucket's parent.
    pub fn blob_root(&self) -> PathBuf {
        self.data_root.join("blobs")
    }

    /// Directory of the JSON catalog.
    pub fn catalog_root(&self) -> PathBuf {
        self.data_root.join("catalog")
    }
}

/// Service-account style credentials file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub project_id: String,
    #[serde(default)]
    pub client_email: Option<String>,
}

impl Credentials {
    /// Load and check the credentials file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let fail = |reason: String| ConfigError::Credentials {
            path: path.display().to_string(),
            reason,
        };
        let bytes = std::fs::read(path).map_err(|e| fail(e.to_string()))?;
        let credentials: Self = serde_json::from_slice(&bytes).map_err(|e| fail(e.to_string()))?;
        if credentials.project_id.trim().is_empty() {
            return Err(fail("project_id is empty".into()));
        }
        Ok(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn required_values_only() {
        let config = DriveConfig::from_lookup(lookup(&[
            (ENV_CREDENTIALS_PATH, "creds.json"),
            (ENV_STORAGE_BUCKET, "drive-bucket"),
        ]))
        .unwrap();
        assert_eq!(config.credentials_path, PathBuf::from("creds.json"));
        assert_eq!(config.storage_bucket, "drive-bucket");
        assert_eq!(config.max_file_size_bytes, 10 * 1024 * 1024);
        assert_eq!(config.collection, "files");
        assert_eq!(config.public_base_url, DEFAULT_PUBLIC_BASE_URL);
        assert_eq!(config.blob_root(), PathBuf::from("drive-data/blobs"));
        assert_eq!(config.catalog_root(), PathBuf::from("drive-data/catalog"));
    }

    #[test]
    fn missing_credentials_path() {
        let err = DriveConfig::from_lookup(lookup(&[(ENV_STORAGE_BUCKET, "b")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(ENV_CREDENTIALS_PATH)));
    }

    #[test]
    fn missing_bucket() {
        let err = DriveConfig::from_lookup(lookup(&[(ENV_CREDENTIALS_PATH, "c.json")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(ENV_STORAGE_BUCKET)));
    }

    #[test]
    fn blank_counts_as_missing() {
        let err = DriveConfig::from_lookup(lookup(&[
            (ENV_CREDENTIALS_PATH, "c.json"),
            (ENV_STORAGE_BUCKET, "  "),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(ENV_STORAGE_BUCKET)));
    }

    #[test]
    fn optional_overrides() {
        let config = DriveConfig::from_lookup(lookup(&[
            (ENV_CREDENTIALS_PATH, "c.json"),
            (ENV_STORAGE_BUCKET, "b"),
            (ENV_DATA_ROOT, "/srv/drive"),
            (ENV_MAX_FILE_SIZE_MB, "25"),
            (ENV_PUBLIC_BASE_URL, "https://cdn.example.com"),
            (ENV_COLLECTION, "archive"),
        ]))
        .unwrap();
        assert_eq!(config.data_root, PathBuf::from("/srv/drive"));
        assert_eq!(config.max_file_size_bytes, 25 * 1024 * 1024);
        assert_eq!(config.public_base_url, "https://cdn.example.com");
        assert_eq!(config.collection, "archive");
    }

    #[test]
    fn invalid_max_size() {
        for bad in ["ten", "0", "-1", "18446744073709551615", "17592186044416"] {
            let err = DriveConfig::from_lookup(lookup(&[
                (ENV_CREDENTIALS_PATH, "c.json"),
                (ENV_STORAGE_BUCKET, "b"),
                (ENV_MAX_FILE_SIZE_MB, bad),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { .. }), "{bad}");
        }
    }

    #[test]
    fn largest_representable_max_size() {
        let config = DriveConfig::from_lookup(lookup(&[
            (ENV_CREDENTIALS_PATH, "c.json"),
            (ENV_STORAGE_BUCKET, "b"),
            (ENV_MAX_FILE_SIZE_MB, "17592186044415"),
        ]))
        .unwrap();
        assert_eq!(config.max_file_size_bytes, 17_592_186_044_415 * 1024 * 1024);
    }

    #[test]
    fn invalid_collection_is_rejected() {
        for bad in ["files.v2", "a/b", ""] {
            let mut config = DriveConfig::new("c.json", "b");
            config.collection = bad.to_string();
            let err = config.validate().unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue { var: ENV_COLLECTION, .. }),
                "{bad}"
            );
        }

        let err = DriveConfig::from_lookup(lookup(&[
            (ENV_CREDENTIALS_PATH, "c.json"),
            (ENV_STORAGE_BUCKET, "b"),
            (ENV_COLLECTION, "files.v2"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: ENV_COLLECTION, .. }));
    }

    #[test]
    fn credentials_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds.json");
        std::fs::write(&path, br#"{"project_id":"demo","client_email":"svc@demo","extra":1}"#)
            .unwrap();
        let creds = Credentials::load(&path).unwrap();
        assert_eq!(creds.project_id, "demo");
        assert_eq!(creds.client_email.as_deref(), Some("svc@demo"));
    }

    #[test]
    fn credentials_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(Credentials::load(&missing), Err(ConfigError::Credentials { .. })));

        let malformed = dir.path().join("bad.json");
        std::fs::write(&malformed, b"nope").unwrap();
        assert!(matches!(Credentials::load(&malformed), Err(ConfigError::Credentials { .. })));

        let empty = dir.path().join("empty.json");
        std::fs::write(&empty, br#"{"project_id":""}"#).unwrap();
        assert!(matches!(Credentials::load(&empty), Err(ConfigError::Credentials { .. })));
    }
}
