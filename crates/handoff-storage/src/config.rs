//! Factory configuration

use handoff_common::{read_json, Paths};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{StorageError, StorageResult};

/// Which backend the factory should build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Try full, degrade to basic
    #[default]
    Auto,
    #[serde(alias = "semantic", alias = "evomem")]
    Full,
    #[serde(alias = "json")]
    Basic,
}

/// Backend-specific settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Directory holding the backend's files
    pub location: PathBuf,
}

impl BackendConfig {
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

/// Storage configuration (`storage.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(rename = "type", default)]
    pub kind: StorageKind,

    #[serde(default = "default_full")]
    pub full: BackendConfig,

    #[serde(default = "default_basic")]
    pub basic: BackendConfig,
}

fn default_full() -> BackendConfig {
    BackendConfig::new("data/vectors/memory")
}

fn default_basic() -> BackendConfig {
    BackendConfig::new("data/memory")
}

impl StorageConfig {
    pub fn new() -> Self {
        Self {
            kind: StorageKind::Auto,
            full: default_full(),
            basic: default_basic(),
        }
    }

    /// Auto-detecting config with both backends under the handoff home
    pub fn under(paths: &Paths) -> Self {
        Self {
            kind: StorageKind::Auto,
            full: BackendConfig::new(paths.semantic_dir()),
            basic: BackendConfig::new(paths.memory_dir()),
        }
    }

    pub fn with_kind(mut self, kind: StorageKind) -> Self {
        self.kind = kind;
        self
    }

    /// Load from a JSON file; `None` when the file does not exist
    pub fn load(path: &Path) -> StorageResult<Option<Self>> {
        read_json(path).map_err(|e| StorageError::Config(format!("{}: {}", path.display(), e)))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_auto() {
        let config: StorageConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, StorageConfig::new());
        assert_eq!(config.kind, StorageKind::Auto);
        assert_eq!(config.basic.location, PathBuf::from("data/memory"));
    }

    #[test]
    fn test_type_aliases() {
        for (raw, kind) in [
            ("auto", StorageKind::Auto),
            ("full", StorageKind::Full),
            ("semantic", StorageKind::Full),
            ("evomem", StorageKind::Full),
            ("basic", StorageKind::Basic),
            ("json", StorageKind::Basic),
        ] {
            let json = format!(r#"{{"type": "{}"}}"#, raw);
            let config: StorageConfig = serde_json::from_str(&json).unwrap();
            assert_eq!(config.kind, kind, "type {}", raw);
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(serde_json::from_str::<StorageConfig>(r#"{"type": "redis"}"#).is_err());
    }

    #[test]
    fn test_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        assert_eq!(StorageConfig::load(&path).unwrap(), None);

        std::fs::write(&path, r#"{"type": "basic", "basic": {"location": "/srv/memory"}}"#)
            .unwrap();
        let config = StorageConfig::load(&path).unwrap().unwrap();
        assert_eq!(config.kind, StorageKind::Basic);
        assert_eq!(config.basic.location, PathBuf::from("/srv/memory"));
        assert_eq!(config.full, default_full());

        std::fs::write(&path, "{broken").unwrap();
        assert!(matches!(
            StorageConfig::load(&path),
            Err(StorageError::Config(_))
        ));
    }

    #[test]
    fn test_under_paths() {
        let config = StorageConfig::under(&Paths::with_root("/tmp/handoff-home"));
        assert!(config.full.location.ends_with("vectors/memory"));
        assert!(config.basic.location.ends_with("memory"));
    }
}
