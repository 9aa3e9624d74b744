//! Backend construction with auto-detection and degradation

use tracing::{info, warn};

use crate::backend::MemoryStorage;
use crate::config::{BackendConfig, StorageConfig, StorageKind};
use crate::error::{BackendFailure, StorageError, StorageResult};
use crate::json::JsonStorage;
use crate::semantic::SemanticStorage;
use crate::types::Capability;

/// Constructs one backend from its config
pub type BackendBuilder = fn(&BackendConfig) -> StorageResult<Box<dyn MemoryStorage>>;

fn build_full(config: &BackendConfig) -> StorageResult<Box<dyn MemoryStorage>> {
    Ok(Box::new(SemanticStorage::open(config)?))
}

fn build_basic(config: &BackendConfig) -> StorageResult<Box<dyn MemoryStorage>> {
    Ok(Box::new(JsonStorage::open(config)?))
}

/// Builds storage backends; each `create` call runs the ladder afresh
#[derive(Clone, Copy)]
pub struct StorageFactory {
    full: BackendBuilder,
    basic: BackendBuilder,
}

impl StorageFactory {
    pub fn new() -> Self {
        Self {
            full: build_full,
            basic: build_basic,
        }
    }

    /// Replace the full backend's constructor
    pub fn with_full_builder(mut self, builder: BackendBuilder) -> Self {
        self.full = builder;
        self
    }

    /// Replace the basic backend's constructor
    pub fn with_basic_builder(mut self, builder: BackendBuilder) -> Self {
        self.basic = builder;
        self
    }

    /// Build the configured backend.
    ///
    /// An explicit `full` or `basic` type propagates its construction error.
    /// `auto` tries full then basic, accepting the first that constructs and
    /// passes its health check, and fails only when neither does.
    pub fn create(&self, config: &StorageConfig) -> StorageResult<Box<dyn MemoryStorage>> {
        match config.kind {
            StorageKind::Full => (self.full)(&config.full),
            StorageKind::Basic => (self.basic)(&config.basic),
            StorageKind::Auto => self.detect(config),
        }
    }

    fn detect(&self, config: &StorageConfig) -> StorageResult<Box<dyn MemoryStorage>> {
        let ladder = [
            (Capability::Full, self.full, &config.full),
            (Capability::Basic, self.basic, &config.basic),
        ];
        let mut failures = Vec::new();

        for (capability, build, backend_config) in ladder {
            let reason = match build(backend_config) {
                Ok(storage) if storage.health_check() => {
                    if failures.is_empty() {
                        info!(backend = %capability, "storage ready");
                    } else {
                        warn!(backend = %capability, "storage degraded; search will return no results");
                    }
                    return Ok(storage);
                }
                Ok(_) => "health check failed".to_string(),
                Err(e) => e.to_string(),
            };

            warn!(backend = %capability, error = %reason, "storage backend unavailable");
            failures.push(BackendFailure { capability, reason });
        }

        Err(StorageError::AllBackendsFailed { failures })
    }
}

impl Default for StorageFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Build storage with the default backends
pub fn create_storage(config: &StorageConfig) -> StorageResult<Box<dyn MemoryStorage>> {
    StorageFactory::new().create(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MemoryItem;

    fn failing(_: &BackendConfig) -> StorageResult<Box<dyn MemoryStorage>> {
        Err(StorageError::construction(Capability::Full, "engine missing"))
    }

    struct Unhealthy;

    impl MemoryStorage for Unhealthy {
        fn capability(&self) -> Capability {
            Capability::Full
        }

        fn store(&self, item: &MemoryItem) -> StorageResult<String> {
            Err(StorageError::write(item.id(), "offline"))
        }

        fn retrieve(&self, _id: &str) -> Option<MemoryItem> {
            None
        }

        fn health_check(&self) -> bool {
            false
        }
    }

    fn unhealthy(_: &BackendConfig) -> StorageResult<Box<dyn MemoryStorage>> {
        Ok(Box::new(Unhealthy))
    }

    fn temp_config(dir: &tempfile::TempDir) -> StorageConfig {
        StorageConfig {
            kind: StorageKind::Auto,
            full: BackendConfig::new(dir.path().join("vectors")),
            basic: BackendConfig::new(dir.path().join("memory")),
        }
    }

    #[test]
    fn test_auto_prefers_full() {
        let dir = tempfile::tempdir().unwrap();
        let storage = create_storage(&temp_config(&dir)).unwrap();
        assert_eq!(storage.capability(), Capability::Full);
    }

    #[test]
    fn test_auto_degrades_when_full_fails() {
        let dir = tempfile::tempdir().unwrap();
        let factory = StorageFactory::new().with_full_builder(failing);
        let storage = factory.create(&temp_config(&dir)).unwrap();
        assert_eq!(storage.capability(), Capability::Basic);
    }

    #[test]
    fn test_auto_degrades_when_full_unhealthy() {
        let dir = tempfile::tempdir().unwrap();
        let factory = StorageFactory::new().with_full_builder(unhealthy);
        let storage = factory.create(&temp_config(&dir)).unwrap();
        assert_eq!(storage.capability(), Capability::Basic);
    }

    #[test]
    fn test_explicit_full_propagates_error() {
        let dir = tempfile::tempdir().unwrap();
        let factory = StorageFactory::new().with_full_builder(failing);
        let config = temp_config(&dir).with_kind(StorageKind::Full);

        assert!(matches!(
            factory.create(&config),
            Err(StorageError::Construction { .. })
        ));
        assert!(!dir.path().join("memory").exists());
    }

    #[test]
    fn test_explicit_basic() {
        let dir = tempfile::tempdir().unwrap();
        let config = temp_config(&dir).with_kind(StorageKind::Basic);
        let storage = create_storage(&config).unwrap();
        assert_eq!(storage.capability(), Capability::Basic);
    }

    #[test]
    fn test_all_backends_failed() {
        let dir = tempfile::tempdir().unwrap();
        let factory = StorageFactory::new()
            .with_full_builder(failing)
            .with_basic_builder(unhealthy);

        match factory.create(&temp_config(&dir)) {
            Err(StorageError::AllBackendsFailed { failures }) => {
                assert_eq!(failures.len(), 2);
                assert_eq!(failures[0].capability, Capability::Full);
                assert!(failures[0].reason.contains("engine missing"));
                assert_eq!(failures[1].capability, Capability::Basic);
                assert_eq!(failures[1].reason, "health check failed");
            }
            other => panic!("expected AllBackendsFailed, got {:?}", other.map(|s| s.capability())),
        }
    }
}
