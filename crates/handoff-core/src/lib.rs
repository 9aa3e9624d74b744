//! Session handoff pipeline: compression, enrichment and cached memory queries

mod enrich;
mod error;
mod hub;
mod orchestrator;
mod types;

pub use enrich::{EnrichError, Enricher};
pub use error::{HandoffError, HandoffResult};
pub use hub::{
    insight, quality_score, HubStats, MemoryHub, QualityWeights, Recommendation,
};
pub use orchestrator::{memory_id, Orchestrator};
pub use types::{HandoffOutcome, HandoffRequest, Todo};
