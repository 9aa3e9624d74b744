//! Pluggable enrichment of compressed context

use handoff_compress::CompressedContext;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct EnrichError(pub String);

/// An external lookup (documentation, web search) that annotates a handoff.
///
/// The record it returns is opaque to the pipeline and is stored under
/// `enhancements.<name>`.
pub trait Enricher {
    fn name(&self) -> &str;

    /// Produce a record of roughly `budget` tokens or fewer
    fn enrich(&self, context: &CompressedContext, budget: usize) -> Result<Value, EnrichError>;
}
