use handoff_core::MemoryHub;
use handoff_storage::{Capability, QueryCache, QueryFilter};
use std::path::Path;

pub fn run(
    config: Option<&Path>,
    query: &str,
    limit: usize,
    filter: &QueryFilter,
) -> anyhow::Result<()> {
    let mut hub = MemoryHub::new(super::open_storage(config)?, QueryCache::new(0));

    if hub.capability() == Capability::Basic {
        tracing::info!("basic storage has no search index; results will be empty");
    }

    let results = hub.search(query, limit, filter);
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
