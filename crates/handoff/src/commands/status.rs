use handoff_storage::create_storage;
use std::path::Path;

pub fn run(config: Option<&Path>) -> anyhow::Result<()> {
    let (storage_config, config_path) = super::load_config(config)?;
    let storage = create_storage(&storage_config)?;

    let output = serde_json::json!({
        "config": config_path.display().to_string(),
        "type": storage_config.kind,
        "backend": storage.capability(),
        "healthy": storage.health_check(),
        "full_location": storage_config.full.location.display().to_string(),
        "basic_location": storage_config.basic.location.display().to_string(),
    });
    println!("{output}");
    Ok(())
}
