//! Capability tiers and the persisted memory unit

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Declared backend tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Store, retrieve and search
    Full,
    /// Store and retrieve only; search is always empty
    Basic,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Full => write!(f, "full"),
            Capability::Basic => write!(f, "basic"),
        }
    }
}

/// A stored handoff record.
///
/// Only `id` is interpreted by the storage layer; every other field is an
/// opaque JSON structure that round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryItem {
    id: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl MemoryItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Set a field; `id` is immutable and cannot be set this way
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if key == "id" {
            return;
        }
        self.fields.insert(key, value);
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.set(key, value);
        self
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Look up a nested field by path, e.g. `["metadata", "project"]`
    pub fn pointer(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.fields.get(*first)?, |value, key| value.get(key))
    }
}

/// Options for `search`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub limit: usize,
}

impl SearchOptions {
    pub fn with_limit(limit: usize) -> Self {
        Self { limit }
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { limit: 5 }
    }
}
