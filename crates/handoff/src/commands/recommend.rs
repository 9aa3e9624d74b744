use handoff_core::MemoryHub;
use handoff_storage::QueryCache;
use std::path::Path;

pub fn run(
    config: Option<&Path>,
    context: &str,
    limit: usize,
    min_quality: u32,
) -> anyhow::Result<()> {
    let mut hub = MemoryHub::new(super::open_storage(config)?, QueryCache::new(0));
    let recommendations = hub.recommendations(context, limit, min_quality);

    tracing::debug!(count = recommendations.len(), "recommendations ready");
    println!("{}", serde_json::to_string_pretty(&recommendations)?);
    Ok(())
}
