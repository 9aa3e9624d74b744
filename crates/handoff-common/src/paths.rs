//! Path resolution for handoff state

use std::path::PathBuf;

/// Resolves standard paths under the user's handoff directory
#[derive(Debug, Clone)]
pub struct Paths {
    pub home_handoff: PathBuf,
}

impl Paths {
    /// Create a new Paths resolver rooted at `~/.handoff`
    pub fn new() -> std::io::Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?;

        Ok(Self::with_root(home.join(".handoff")))
    }

    /// Create a resolver rooted at an explicit directory
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            home_handoff: root.into(),
        }
    }

    /// Get storage.json path (factory configuration)
    pub fn config_file(&self) -> PathBuf {
        self.home_handoff.join("storage.json")
    }

    /// Get the basic backend's record directory
    pub fn memory_dir(&self) -> PathBuf {
        self.home_handoff.join("memory")
    }

    /// Get the full backend's index directory
    pub fn semantic_dir(&self) -> PathBuf {
        self.home_handoff.join("vectors").join("memory")
    }
}
