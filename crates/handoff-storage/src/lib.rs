//! Capability-typed memory storage with auto-detecting backend selection

mod backend;
mod cache;
mod config;
mod error;
mod factory;
mod json;
mod semantic;
mod types;

pub use backend::MemoryStorage;
pub use cache::{QueryCache, QueryFilter, QueryKey};
pub use config::{BackendConfig, StorageConfig, StorageKind};
pub use error::{BackendFailure, StorageError, StorageResult};
pub use factory::{create_storage, BackendBuilder, StorageFactory};
pub use json::JsonStorage;
pub use semantic::SemanticStorage;
pub use types::{Capability, MemoryItem, SearchOptions};
