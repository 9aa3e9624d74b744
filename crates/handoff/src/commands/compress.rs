use handoff_common::atomic_write;
use handoff_compress::{Compressor, ExtractLimits};
use std::path::Path;

pub fn run(input: &Path, output: Option<&Path>, legacy: bool) -> anyhow::Result<()> {
    let conversation = super::read_input(input)?;

    let compressor = if legacy {
        Compressor::with_limits(ExtractLimits::legacy())
    } else {
        Compressor::new()
    };
    let context = compressor.compress(&conversation);
    let json = serde_json::to_string_pretty(&context)?;

    match output {
        Some(path) => {
            atomic_write(path, json.as_bytes())?;
            let meta = &context.compression_metadata;
            tracing::info!(
                path = %path.display(),
                original_tokens = meta.original_tokens,
                compressed_tokens = meta.compressed_tokens,
                "wrote compressed context"
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}
