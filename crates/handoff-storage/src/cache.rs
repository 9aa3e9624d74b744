//! Bounded query result cache with oldest-first eviction

use std::num::NonZeroUsize;

use lru::LruCache;

use crate::types::MemoryItem;

/// Metadata restrictions applied to search results
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryFilter {
    /// `metadata.expert` must equal this
    pub expert: Option<String>,
    /// `metadata.project` must equal this
    pub project: Option<String>,
}

impl QueryFilter {
    pub fn with_expert(mut self, expert: impl Into<String>) -> Self {
        self.expert = Some(expert.into());
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.expert.is_none() && self.project.is_none()
    }

    pub fn matches(&self, item: &MemoryItem) -> bool {
        let field = |name: &str| item.pointer(&["metadata", name]).and_then(|v| v.as_str());
        let accepts = |wanted: &Option<String>, name: &str| match wanted {
            Some(wanted) => field(name) == Some(wanted.as_str()),
            None => true,
        };

        accepts(&self.expert, "expert") && accepts(&self.project, "project")
    }
}

/// Cache key: query text, result limit and filter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub query: String,
    pub limit: usize,
    pub filter: QueryFilter,
}

impl QueryKey {
    pub fn new(query: &str, limit: usize, filter: &QueryFilter) -> Self {
        Self {
            query: query.to_string(),
            limit,
            filter: filter.clone(),
        }
    }
}

/// Results are read with `peek` and replaced in place, so recency never
/// changes after insertion and the least recently used entry is the oldest.
#[derive(Debug)]
pub struct QueryCache {
    entries: Option<LruCache<QueryKey, Vec<MemoryItem>>>,
    hits: u64,
    misses: u64,
}

impl QueryCache {
    /// A capacity of zero disables caching
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(LruCache::new),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&mut self, key: &QueryKey) -> Option<&[MemoryItem]> {
        match self.entries.as_ref().and_then(|entries| entries.peek(key)) {
            Some(results) => {
                self.hits += 1;
                Some(results)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: QueryKey, results: Vec<MemoryItem>) {
        let Some(entries) = self.entries.as_mut() else {
            return;
        };

        match entries.peek_mut(&key) {
            Some(existing) => *existing = results,
            None => {
                entries.put(key, results);
            }
        }
    }

    /// Drop every cached result
    pub fn invalidate(&mut self) {
        if let Some(entries) = self.entries.as_mut() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, LruCache::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| entries.cap().get())
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(0)
    }
}
