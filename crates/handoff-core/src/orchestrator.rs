//! Compress, enrich and store a session handoff

use chrono::{DateTime, SecondsFormat, Utc};
use handoff_common::estimate_tokens;
use handoff_compress::{
    extract_code_patterns, extract_decisions, extract_learnings, CompressedContext, Compressor,
};
use handoff_storage::{MemoryItem, MemoryStorage};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::enrich::Enricher;
use crate::error::HandoffResult;
use crate::types::{HandoffOutcome, HandoffRequest};

const ITEM_TYPE: &str = "handoff";
const UNKNOWN: &str = "Unknown";

struct Enrichment {
    enricher: Box<dyn Enricher>,
    budget: usize,
}

/// Owns one storage backend and runs handoffs against it
pub struct Orchestrator {
    compressor: Compressor,
    storage: Box<dyn MemoryStorage>,
    enrichments: Vec<Enrichment>,
}

impl Orchestrator {
    pub fn new(storage: Box<dyn MemoryStorage>) -> Self {
        Self {
            compressor: Compressor::new(),
            storage,
            enrichments: Vec::new(),
        }
    }

    pub fn with_compressor(mut self, compressor: Compressor) -> Self {
        self.compressor = compressor;
        self
    }

    /// Add an enrichment step with its own token budget
    pub fn with_enricher(mut self, enricher: Box<dyn Enricher>, budget: usize) -> Self {
        self.enrichments.push(Enrichment { enricher, budget });
        self
    }

    pub fn storage(&self) -> &dyn MemoryStorage {
        self.storage.as_ref()
    }

    pub fn run(&self, request: &HandoffRequest) -> HandoffResult<HandoffOutcome> {
        self.run_at(request, Utc::now())
    }

    /// Run a handoff as of `now`, which fixes both the timestamp and the id.
    /// Two handoffs in the same second share an id; the later one wins.
    pub fn run_at(
        &self,
        request: &HandoffRequest,
        now: DateTime<Utc>,
    ) -> HandoffResult<HandoffOutcome> {
        let context = self.compressor.compress_at(&request.conversation, now);
        let enhancements = self.enrich(&context);

        let memory_id = memory_id(now);
        let item = self.build_item(&memory_id, request, &context, enhancements, now)?;

        let memory_id = self.storage.store(&item)?;
        info!(
            id = %memory_id,
            backend = %self.storage.capability(),
            compressed_tokens = context.compression_metadata.compressed_tokens,
            "handoff stored"
        );

        Ok(HandoffOutcome {
            memory_id,
            item,
            context,
            capability: self.storage.capability(),
        })
    }

    fn enrich(&self, context: &CompressedContext) -> Map<String, Value> {
        let mut enhancements = Map::new();

        for Enrichment { enricher, budget } in &self.enrichments {
            let name = enricher.name();
            let record = match enricher.enrich(context, *budget) {
                Ok(record) => record,
                Err(e) => {
                    warn!(enricher = name, error = %e, "enrichment skipped");
                    continue;
                }
            };

            let tokens_added = estimate_tokens(&record.to_string());
            if tokens_added > *budget {
                warn!(enricher = name, tokens_added, budget, "enrichment over budget, skipped");
                continue;
            }

            enhancements.insert(
                name.to_string(),
                json!({
                    "tokens_budget": budget,
                    "tokens_added": tokens_added,
                    "result": record,
                }),
            );
        }

        enhancements
    }

    fn build_item(
        &self,
        memory_id: &str,
        request: &HandoffRequest,
        context: &CompressedContext,
        enhancements: Map<String, Value>,
        now: DateTime<Utc>,
    ) -> HandoffResult<MemoryItem> {
        let metadata = &context.compression_metadata;
        let token_before = request.current_tokens.unwrap_or(metadata.original_tokens);

        let session_memory = json!({
            "sessionIntent": context.session_intent,
            "playByPlay": context.play_by_play,
            "artifacts": context.artifacts,
            "breadcrumbs": context.breadcrumbs,
            "todos": serde_json::to_value(&request.todos)?,
            "decisions": serde_json::to_value(extract_decisions(&request.conversation))?,
        });

        let long_term_memory = json!({
            "learnings": serde_json::to_value(extract_learnings(&context.play_by_play))?,
            "best_practices": [],
            "code_patterns": serde_json::to_value(extract_code_patterns(&context.breadcrumbs))?,
        });

        Ok(MemoryItem::new(memory_id)
            .with("type", json!(ITEM_TYPE))
            .with(
                "timestamp",
                json!(now.to_rfc3339_opts(SecondsFormat::Secs, true)),
            )
            .with("session_memory", session_memory)
            .with("long_term_memory", long_term_memory)
            .with("enhancements", Value::Object(enhancements))
            .with(
                "metadata",
                json!({
                    "project": request.project.as_deref().unwrap_or(UNKNOWN),
                    "phase": request.phase.as_deref().unwrap_or(UNKNOWN),
                    "token_before": token_before,
                    "token_after": metadata.compressed_tokens,
                    "compression_ratio": metadata.compression_rate,
                }),
            ))
    }
}

/// `mem_<YYYYmmdd_HHMMSS>` in UTC
pub fn memory_id(now: DateTime<Utc>) -> String {
    format!("mem_{}", now.format("%Y%m%d_%H%M%S"))
}
