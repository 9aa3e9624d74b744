use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured signals distilled from a conversation transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressedContext {
    pub session_intent: Vec<String>,
    pub play_by_play: Vec<String>,
    pub artifacts: Vec<String>,
    pub breadcrumbs: Vec<String>,
    pub compression_metadata: CompressionMetadata,
}

impl CompressedContext {
    /// Borrowed view of the four signal lists, serialized in a fixed key order
    pub fn signals(&self) -> Signals<'_> {
        Signals {
            session_intent: &self.session_intent,
            play_by_play: &self.play_by_play,
            artifacts: &self.artifacts,
            breadcrumbs: &self.breadcrumbs,
        }
    }
}

/// Canonical serialization input for the compressed token count
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Signals<'a> {
    pub session_intent: &'a [String],
    pub play_by_play: &'a [String],
    pub artifacts: &'a [String],
    pub breadcrumbs: &'a [String],
}

/// Token bookkeeping for one compression run.
///
/// `compression_rate` is always derived from the two token counts, including
/// when deserializing: any rate present in the input is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawCompressionMetadata")]
pub struct CompressionMetadata {
    pub original_tokens: usize,
    pub compressed_tokens: usize,
    pub compression_rate: f64,
    pub timestamp: DateTime<Utc>,
}

impl CompressionMetadata {
    pub fn new(original_tokens: usize, compressed_tokens: usize, timestamp: DateTime<Utc>) -> Self {
        Self {
            original_tokens,
            compressed_tokens,
            compression_rate: compression_rate(original_tokens, compressed_tokens),
            timestamp,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCompressionMetadata {
    original_tokens: usize,
    compressed_tokens: usize,
    timestamp: DateTime<Utc>,
}

impl From<RawCompressionMetadata> for CompressionMetadata {
    fn from(raw: RawCompressionMetadata) -> Self {
        Self::new(raw.original_tokens, raw.compressed_tokens, raw.timestamp)
    }
}

/// `1 - compressed/original`, floored at 0.0; 0.0 when there is nothing to compress
pub fn compression_rate(original_tokens: usize, compressed_tokens: usize) -> f64 {
    if original_tokens == 0 {
        return 0.0;
    }
    (1.0 - compressed_tokens as f64 / original_tokens as f64).max(0.0)
}
