use chrono::{DateTime, Utc};
use handoff_common::estimate_tokens;

use crate::extract::{ExtractLimits, Extractor};
use crate::types::{CompressedContext, CompressionMetadata};

/// Runs the four extraction passes and records token bookkeeping
#[derive(Debug, Clone, Default)]
pub struct Compressor {
    extractor: Extractor,
}

impl Compressor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: ExtractLimits) -> Self {
        Self {
            extractor: Extractor::new(limits),
        }
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    pub fn compress(&self, conversation: &str) -> CompressedContext {
        self.compress_at(conversation, Utc::now())
    }

    /// Compress with an explicit timestamp instead of reading the clock
    pub fn compress_at(&self, conversation: &str, timestamp: DateTime<Utc>) -> CompressedContext {
        let mut context = CompressedContext {
            session_intent: self.extractor.session_intent(conversation),
            play_by_play: self.extractor.actions(conversation),
            artifacts: self.extractor.artifacts(conversation),
            breadcrumbs: self.extractor.breadcrumbs(conversation),
            compression_metadata: CompressionMetadata::new(0, 0, timestamp),
        };

        let original_tokens = estimate_tokens(conversation);
        // Serializing borrowed string slices cannot fail
        let compressed_tokens = serde_json::to_string(&context.signals())
            .map(|json| estimate_tokens(&json))
            .unwrap_or(0);

        context.compression_metadata =
            CompressionMetadata::new(original_tokens, compressed_tokens, timestamp);

        tracing::debug!(
            original_tokens,
            compressed_tokens,
            intents = context.session_intent.len(),
            actions = context.play_by_play.len(),
            artifacts = context.artifacts.len(),
            breadcrumbs = context.breadcrumbs.len(),
            "compressed conversation"
        );

        context
    }
}

/// Compress with the standard extraction limits
pub fn compress(conversation: &str) -> CompressedContext {
    Compressor::new().compress(conversation)
}
