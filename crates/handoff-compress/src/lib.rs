//! Heuristic context compression for session handoffs

pub mod compressor;
pub mod extract;
pub mod insights;
mod types;

pub use compressor::{compress, Compressor};
pub use extract::{BreadcrumbOrder, BreadcrumbStyle, ExtractLimits, Extractor};
pub use insights::{
    extract_code_patterns, extract_decisions, extract_learnings, CodePattern, Decision, Learning,
    LearningKind,
};
pub use types::{compression_rate, CompressedContext, CompressionMetadata, Signals};
