pub mod compress;
pub mod recommend;
pub mod retrieve;
pub mod run;
pub mod search;
pub mod status;

use anyhow::Context;
use handoff_common::Paths;
use handoff_storage::{create_storage, MemoryStorage, StorageConfig};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Resolve the storage config: an explicit file must exist, the default
/// `~/.handoff/storage.json` may be absent
pub fn load_config(path: Option<&Path>) -> anyhow::Result<(StorageConfig, PathBuf)> {
    if let Some(path) = path {
        let config = StorageConfig::load(path)?
            .with_context(|| format!("config file not found: {}", path.display()))?;
        return Ok((config, path.to_path_buf()));
    }

    let paths = Paths::new()?;
    let path = paths.config_file();
    let config = StorageConfig::load(&path)?.unwrap_or_else(|| StorageConfig::under(&paths));
    Ok((config, path))
}

pub fn open_storage(path: Option<&Path>) -> anyhow::Result<Box<dyn MemoryStorage>> {
    let (config, _) = load_config(path)?;
    Ok(create_storage(&config)?)
}

/// Read a whole file, or stdin for `-`
pub fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
