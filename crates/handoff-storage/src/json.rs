//! BASIC backend: one pretty-printed JSON document per memory

use handoff_common::{read_json, write_json};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::backend::MemoryStorage;
use crate::config::BackendConfig;
use crate::error::{StorageError, StorageResult};
use crate::types::{Capability, MemoryItem};

const PROBE_FILE: &str = ".health";

pub struct JsonStorage {
    dir: PathBuf,
}

impl JsonStorage {
    /// Use `config.location` as the record directory, creating it if needed
    pub fn open(config: &BackendConfig) -> StorageResult<Self> {
        std::fs::create_dir_all(&config.location)
            .map_err(|e| StorageError::construction(Capability::Basic, e))?;

        debug!(location = %config.location.display(), "opened basic storage");
        Ok(Self {
            dir: config.location.clone(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Record path for `id`
    pub fn record_path(&self, id: &str) -> PathBuf {
        self.dir.join(file_name(id))
    }
}

impl MemoryStorage for JsonStorage {
    fn capability(&self) -> Capability {
        Capability::Basic
    }

    fn store(&self, item: &MemoryItem) -> StorageResult<String> {
        write_json(&self.record_path(item.id()), item)
            .map_err(|e| StorageError::write(item.id(), e))?;

        debug!(backend = "basic", id = item.id(), "stored memory");
        Ok(item.id().to_string())
    }

    fn retrieve(&self, id: &str) -> Option<MemoryItem> {
        read_json(&self.record_path(id)).unwrap_or_else(|e| {
            warn!(backend = "basic", id, error = %e, "unreadable memory record");
            None
        })
    }

    fn health_check(&self) -> bool {
        if !self.dir.is_dir() {
            return false;
        }

        let probe = self.dir.join(PROBE_FILE);
        let writable = std::fs::write(&probe, b"ok").is_ok();
        let _ = std::fs::remove_file(&probe);
        writable
    }
}

/// Deterministic file name: `[A-Za-z0-9_-]` kept, every other byte percent-encoded
fn file_name(id: &str) -> String {
    // `encode` leaves `.` and `~` alone; `..` must not survive as a name
    let encoded = urlencoding::encode(id)
        .replace('.', "%2E")
        .replace('~', "%7E");
    format!("{}.json", encoded)
}
