//! The capability-typed storage interface

use crate::error::StorageResult;
use crate::types::{Capability, MemoryItem, SearchOptions};

/// Uniform storage over backends with different capability tiers.
///
/// Callers never branch on `capability()` before calling `search`: a backend
/// without search keeps the default, which is indistinguishable from "no
/// results".
pub trait MemoryStorage {
    fn capability(&self) -> Capability;

    /// Persist `item` under its id, overwriting any previous record.
    /// A failed write is always reported.
    fn store(&self, item: &MemoryItem) -> StorageResult<String>;

    /// The stored item, or `None` when absent or unreadable
    fn retrieve(&self, id: &str) -> Option<MemoryItem>;

    fn search(&self, _query: &str, _options: &SearchOptions) -> Vec<MemoryItem> {
        Vec::new()
    }

    /// Liveness probe; never fails, `false` means unusable
    fn health_check(&self) -> bool;
}
