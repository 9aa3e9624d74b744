//! Shared token estimation, JSON file I/O and path resolution

mod io;
mod paths;
mod tokens;

pub use io::{atomic_write, read_json, write_json};
pub use paths::Paths;
pub use tokens::{estimate_tokens, estimate_tokens_simple};
