use std::path::Path;

pub fn run(config: Option<&Path>, id: &str) -> anyhow::Result<()> {
    let storage = super::open_storage(config)?;

    let Some(item) = storage.retrieve(id) else {
        anyhow::bail!("memory not found: {id}");
    };

    println!("{}", serde_json::to_string_pretty(&item)?);
    Ok(())
}
