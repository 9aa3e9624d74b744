//! Cached query layer over a storage backend

use chrono::{DateTime, NaiveDateTime, Utc};
use handoff_storage::{
    Capability, MemoryItem, MemoryStorage, QueryCache, QueryFilter, QueryKey, SearchOptions,
    StorageResult,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Storage is asked for this many times the requested results so filtering
/// still leaves enough to fill the limit
const OVERFETCH: usize = 2;

/// Neither present nor parseable
const UNKNOWN_TIMELINESS: f64 = 50.0;

/// Query statistics for a hub
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HubStats {
    pub total_queries: u64,
    /// Searches that applied an expert filter
    pub filtered_queries: u64,
    pub cache_hits: u64,
    pub cache_hit_rate: f64,
    pub cache_size: usize,
    pub capability: Capability,
}

/// Relative weight of each quality dimension
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityWeights {
    pub source: f64,
    pub frequency: f64,
    pub timeliness: f64,
    pub validation: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            source: 0.4,
            frequency: 0.2,
            timeliness: 0.2,
            validation: 0.2,
        }
    }
}

impl QualityWeights {
    /// Score `item` from 0 to 100 using its `metadata.{source, frequency,
    /// timestamp, validated}` fields as of `now`
    pub fn score(&self, item: &MemoryItem, now: DateTime<Utc>) -> u32 {
        let field = |name: &str| item.pointer(&["metadata", name]);

        let source = match field("source").and_then(Value::as_str) {
            Some("validated") => 100.0,
            Some("documented") => 80.0,
            Some("inferred") => 60.0,
            _ => 40.0,
        };

        let frequency = field("frequency").and_then(Value::as_f64).unwrap_or(1.0);
        let frequency = (frequency * 10.0).min(100.0);

        let timestamp = field("timestamp").or_else(|| item.get("timestamp"));
        let timeliness = match timestamp.and_then(Value::as_str).and_then(parse_timestamp) {
            Some(at) => (100 - (now - at).num_days()).clamp(0, 100) as f64,
            None => UNKNOWN_TIMELINESS,
        };

        let validation = match field("validated").and_then(Value::as_bool) {
            Some(true) => 100.0,
            _ => 0.0,
        };

        let mut score = 0.0;
        score += source * self.source;
        score += frequency * self.frequency;
        score += timeliness * self.timeliness;
        score += validation * self.validation;
        score.max(0.0) as u32
    }
}

/// Quality score with the default weights
pub fn quality_score(item: &MemoryItem, now: DateTime<Utc>) -> u32 {
    QualityWeights::default().score(item, now)
}

/// RFC 3339, or a naive ISO-8601 timestamp read as UTC
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|at| at.and_utc())
}

/// One-line hint keyed on `metadata.type`
pub fn insight(item: &MemoryItem) -> String {
    let field = |name: &str| {
        item.pointer(&["metadata", name])
            .and_then(Value::as_str)
            .unwrap_or("unknown")
    };
    let expert = field("expert");

    match field("type") {
        "bug" => "Past bug: cover the boundary conditions".to_string(),
        "learning" => "Best practice: consider reusing this pattern".to_string(),
        "decision" => format!("Architecture decision from {}", expert),
        "test_case" => "Test case: reusable in the current scenario".to_string(),
        _ => format!("Related memory from {}", expert),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub memory: MemoryItem,
    pub quality_score: u32,
    pub insight: String,
}

pub struct MemoryHub {
    storage: Box<dyn MemoryStorage>,
    cache: QueryCache,
    weights: QualityWeights,
    total_queries: u64,
    filtered_queries: u64,
}

impl MemoryHub {
    pub fn new(storage: Box<dyn MemoryStorage>, cache: QueryCache) -> Self {
        Self {
            storage,
            cache,
            weights: QualityWeights::default(),
            total_queries: 0,
            filtered_queries: 0,
        }
    }

    pub fn with_weights(mut self, weights: QualityWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn capability(&self) -> Capability {
        self.storage.capability()
    }

    /// Write through to storage; every write empties the query cache
    pub fn store(&mut self, item: &MemoryItem) -> StorageResult<String> {
        self.cache.invalidate();
        self.storage.store(item)
    }

    pub fn retrieve(&self, id: &str) -> Option<MemoryItem> {
        self.storage.retrieve(id)
    }

    /// Up to `limit` results matching `filter`, best first
    pub fn search(&mut self, query: &str, limit: usize, filter: &QueryFilter) -> Vec<MemoryItem> {
        self.total_queries += 1;

        let key = QueryKey::new(query, limit, filter);
        if let Some(cached) = self.cache.get(&key) {
            debug!(query, "query cache hit");
            return cached.to_vec();
        }

        let options = SearchOptions::with_limit(limit.saturating_mul(OVERFETCH));
        let mut results = self.storage.search(query, &options);
        if filter.expert.is_some() {
            self.filtered_queries += 1;
        }
        if !filter.is_empty() {
            results.retain(|item| filter.matches(item));
        }
        results.truncate(limit);

        debug!(query, results = results.len(), "query executed");
        self.cache.insert(key, results.clone());
        results
    }

    pub fn recommendations(
        &mut self,
        context: &str,
        limit: usize,
        min_quality: u32,
    ) -> Vec<Recommendation> {
        self.recommendations_at(context, limit, min_quality, Utc::now())
    }

    /// Related memories scoring at least `min_quality`, highest score first
    pub fn recommendations_at(
        &mut self,
        context: &str,
        limit: usize,
        min_quality: u32,
        now: DateTime<Utc>,
    ) -> Vec<Recommendation> {
        let weights = self.weights;
        let mut recommendations: Vec<Recommendation> = self
            .search(context, limit, &QueryFilter::default())
            .into_iter()
            .filter_map(|memory| {
                let quality_score = weights.score(&memory, now);
                (quality_score >= min_quality).then(|| Recommendation {
                    insight: insight(&memory),
                    quality_score,
                    memory,
                })
            })
            .collect();

        recommendations.sort_by(|a, b| b.quality_score.cmp(&a.quality_score));
        recommendations
    }

    pub fn clear_cache(&mut self) {
        self.cache.invalidate();
    }

    pub fn stats(&self) -> HubStats {
        let cache_hits = self.cache.hits();
        HubStats {
            total_queries: self.total_queries,
            filtered_queries: self.filtered_queries,
            cache_hits,
            cache_hit_rate: if self.total_queries > 0 {
                cache_hits as f64 / self.total_queries as f64
            } else {
                0.0
            },
            cache_size: self.cache.len(),
            capability: self.storage.capability(),
        }
    }
}
