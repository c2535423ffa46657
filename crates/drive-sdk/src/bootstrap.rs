use std::sync::{Arc, Mutex, PoisonError};

use drive_catalog::JsonFileCatalogStore;
use drive_store::FsBlobStore;

use crate::config::{Credentials, DriveConfig};
use crate::error::ConfigError;
use crate::service::CatalogService;

/// The process-wide store handles and the service built on them.
#[derive(Debug)]
pub struct DriveContext {
    config: DriveConfig,
    credentials: Credentials,
    service: Arc<CatalogService>,
}

impl DriveContext {
    /// Load credentials and open both local backends under `config.data_root`.
    pub fn open(config: DriveConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let credentials = Credentials::load(&config.credentials_path)?;

        let blobs = FsBlobStore::open(
            config.blob_root(),
            config.storage_bucket.clone(),
            &config.public_base_url,
        )
        .map_err(|e| ConfigError::Backend(e.to_string()))?;
        let catalog = JsonFileCatalogStore::open(config.catalog_root())
            .map_err(|e| ConfigError::Backend(e.to_string()))?;

        let service = CatalogService::new(Arc::new(blobs), Arc::new(catalog))
            .with_collection(config.collection.clone())
            .with_max_file_size(config.max_file_size_bytes);

        tracing::info!(
            project = %credentials.project_id,
            bucket = %config.storage_bucket,
            data_root = %config.data_root.display(),
            "drive initialized"
        );

        Ok(Self {
            config,
            credentials,
            service: Arc::new(service),
        })
    }

    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn service(&self) -> &CatalogService {
        &self.service
    }

    /// A shared handle to the service, for moving onto worker threads.
    pub fn shared_service(&self) -> Arc<CatalogService> {
        Arc::clone(&self.service)
    }
}

/// One-time initialization of the [`DriveContext`].
///
/// The first successful [`get_or_init`](Self::get_or_init) builds the context;
/// every later call returns the same handle without re-reading configuration.
/// A failed initialization leaves the bootstrap empty so it can be retried.
#[derive(Debug, Default)]
pub struct Bootstrap {
    context: Mutex<Option<Arc<DriveContext>>>,
}

impl Bootstrap {
    pub const fn new() -> Self {
        Self {
            context: Mutex::new(None),
        }
    }

    pub fn get_or_init(
        &self,
        init: impl FnOnce() -> Result<DriveConfig, ConfigError>,
    ) -> Result<Arc<DriveContext>, ConfigError> {
        let mut slot = self.context.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(context) = slot.as_ref() {
            return Ok(Arc::clone(context));
        }
        let context = Arc::new(DriveContext::open(init()?)?);
        *slot = Some(Arc::clone(&context));
        Ok(context)
    }

    /// Initialize from the environment (and `.env`).
    pub fn from_env(&self) -> Result<Arc<DriveContext>, ConfigError> {
        self.get_or_init(DriveConfig::from_env)
    }

    pub fn get(&self) -> Option<Arc<DriveContext>> {
        self.context
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn config_in(dir: &Path) -> DriveConfig {
        let creds = dir.join("creds.json");
        std::fs::write(&creds, br#"{"project_id":"drive-test"}"#).unwrap();
        let mut config = DriveConfig::new(creds, "test-bucket");
        config.data_root = dir.join("data");
        config
    }

    #[test]
    fn open_builds_working_service() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = DriveContext::open(config_in(dir.path())).unwrap();
        assert_eq!(ctx.credentials().project_id, "drive-test");

        let record = ctx.service().upload(b"hello", "a.txt", Some("text/plain")).unwrap();
        assert!(record
            .download_url
            .starts_with("http://127.0.0.1:8080/v1/blobs/test-bucket/uploads/"));
        assert_eq!(ctx.service().list(), vec![record]);
    }

    #[test]
    fn open_fails_on_missing_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.credentials_path = dir.path().join("nope.json");
        let err = DriveContext::open(config).unwrap_err();
        assert!(matches!(err, ConfigError::Credentials { .. }));
    }

    #[test]
    fn open_fails_on_bad_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.public_base_url = "not a url".into();
        let err = DriveContext::open(config).unwrap_err();
        assert!(matches!(err, ConfigError::Backend(_)));
    }

    #[test]
    fn open_fails_on_invalid_collection_before_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.collection = "files.v2".into();
        let err = DriveContext::open(config).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                var: crate::config::ENV_COLLECTION,
                ..
            }
        ));
        assert!(!dir.path().join("data").exists());
    }

    #[test]
    fn get_or_init_runs_once() {
        let dir = tempfile::tempdir().unwrap();
        let bootstrap = Bootstrap::new();
        assert!(!bootstrap.is_initialized());

        let first = bootstrap.get_or_init(|| Ok(config_in(dir.path()))).unwrap();
        let second = bootstrap
            .get_or_init(|| panic!("must not re-read configuration"))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(bootstrap.is_initialized());
        assert!(Arc::ptr_eq(&first, &bootstrap.get().unwrap()));
    }

    #[test]
    fn failed_init_can_be_retried() {
        let dir = tempfile::tempdir().unwrap();
        let bootstrap = Bootstrap::new();

        let err = bootstrap
            .get_or_init(|| Err(ConfigError::MissingVar("DRIVE_STORAGE_BUCKET")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(_)));
        assert!(bootstrap.get().is_none());

        bootstrap.get_or_init(|| Ok(config_in(dir.path()))).unwrap();
        assert!(bootstrap.is_initialized());
    }

    #[test]
    fn context_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let id = DriveContext::open(config_in(dir.path()))
            .unwrap()
            .service()
            .upload(b"persisted", "p.txt", None)
            .unwrap()
            .id;

        let ctx = DriveContext::open(config_in(dir.path())).unwrap();
        assert!(ctx.service().find(&id).is_some());
    }
}
