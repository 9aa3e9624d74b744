//! FULL backend: SQLite with an FTS5 index over a labeled text digest

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{json, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::backend::MemoryStorage;
use crate::config::BackendConfig;
use crate::error::{StorageError, StorageResult};
use crate::types::{Capability, MemoryItem, SearchOptions};

const DB_FILE: &str = "memory.db";
const EMPTY_CONTENT: &str = "Memory handoff";

pub struct SemanticStorage {
    conn: Connection,
    location: PathBuf,
}

impl SemanticStorage {
    /// Open the index under `config.location`, failing if FTS5 is unavailable
    pub fn open(config: &BackendConfig) -> StorageResult<Self> {
        std::fs::create_dir_all(&config.location).map_err(unavailable)?;
        let conn = Connection::open(config.location.join(DB_FILE)).map_err(unavailable)?;

        probe_fts5(&conn)?;
        init_schema(&conn).map_err(unavailable)?;

        debug!(location = %config.location.display(), "opened full storage");
        Ok(Self {
            conn,
            location: config.location.clone(),
        })
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    fn write(&self, item: &MemoryItem, content: &str) -> StorageResult<()> {
        let metadata = serde_json::to_string(&index_metadata(item))?;
        let body = serde_json::to_string(item)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO memories (id, content, metadata, item, stored_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![item.id(), content, metadata, body, Utc::now().to_rfc3339()],
        )?;
        tx.execute("DELETE FROM memories_fts WHERE id = ?1", params![item.id()])?;
        tx.execute(
            "INSERT INTO memories_fts (id, content) VALUES (?1, ?2)",
            params![item.id(), content],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn load(&self, id: &str) -> StorageResult<Option<MemoryItem>> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT item FROM memories WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        match body {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }

    fn query(&self, query: &str, limit: usize) -> StorageResult<Vec<MemoryItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT m.item FROM memories m
             JOIN memories_fts f ON m.id = f.id
             WHERE memories_fts MATCH ?1
             ORDER BY rank
             LIMIT ?2",
        )?;

        let bodies = stmt
            .query_map(params![fts_query(query), limit as i64], |row| {
                row.get::<_, String>(0)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        bodies
            .iter()
            .map(|body| serde_json::from_str(body).map_err(Into::into))
            .collect()
    }
}

impl MemoryStorage for SemanticStorage {
    fn capability(&self) -> Capability {
        Capability::Full
    }

    fn store(&self, item: &MemoryItem) -> StorageResult<String> {
        let content = build_content(item);
        self.write(item, &content)
            .map_err(|e| StorageError::write(item.id(), e))?;

        debug!(backend = "full", id = item.id(), "stored memory");
        Ok(item.id().to_string())
    }

    fn retrieve(&self, id: &str) -> Option<MemoryItem> {
        self.load(id).unwrap_or_else(|e| {
            warn!(backend = "full", id, error = %e, "retrieve failed");
            None
        })
    }

    fn search(&self, query: &str, options: &SearchOptions) -> Vec<MemoryItem> {
        if query.trim().is_empty() || options.limit == 0 {
            return Vec::new();
        }

        self.query(query, options.limit).unwrap_or_else(|e| {
            warn!(backend = "full", query, error = %e, "search failed");
            Vec::new()
        })
    }

    fn health_check(&self) -> bool {
        self.conn
            .query_row("SELECT count(*) FROM memories_fts", [], |row| {
                row.get::<_, i64>(0)
            })
            .is_ok()
    }
}

fn unavailable(e: impl fmt::Display) -> StorageError {
    StorageError::construction(Capability::Full, e)
}

fn probe_fts5(conn: &Connection) -> StorageResult<()> {
    let enabled: i64 = conn
        .query_row("SELECT sqlite_compileoption_used('ENABLE_FTS5')", [], |row| {
            row.get(0)
        })
        .map_err(unavailable)?;

    if enabled == 0 {
        return Err(unavailable("SQLite was built without FTS5"));
    }
    Ok(())
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS memories (
            id TEXT PRIMARY KEY,
            content TEXT NOT NULL,
            metadata TEXT NOT NULL,
            item TEXT NOT NULL,
            stored_at TEXT NOT NULL
        );
        CREATE VIRTUAL TABLE IF NOT EXISTS memories_fts USING fts5(
            id UNINDEXED,
            content
        );
        ",
    )
}

/// Each whitespace-separated term as a quoted FTS5 string, any of which may match
fn fts_query(query: &str) -> String {
    query
        .split_whitespace()
        .map(|term| format!("\"{}\"", term.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(" OR ")
}

/// Text submitted for indexing: intent, todos, decisions and learnings,
/// each on its own labeled line
pub(crate) fn build_content(item: &MemoryItem) -> String {
    let sections = [
        labeled(item, &["session_memory", "sessionIntent"], None, "Intent", ", "),
        labeled(item, &["session_memory", "todos"], Some("content"), "TODOs", "; "),
        labeled(item, &["session_memory", "decisions"], Some("decision"), "Decisions", "; "),
        labeled(item, &["long_term_memory", "learnings"], Some("pattern"), "Learnings", "; "),
    ];

    let parts: Vec<String> = sections.into_iter().flatten().collect();
    if parts.is_empty() {
        EMPTY_CONTENT.to_string()
    } else {
        parts.join("\n")
    }
}

fn labeled(
    item: &MemoryItem,
    path: &[&str],
    field: Option<&str>,
    label: &str,
    separator: &str,
) -> Option<String> {
    let entries: Vec<&str> = item
        .pointer(path)?
        .as_array()?
        .iter()
        .filter_map(|entry| match field {
            Some(field) => entry.get(field)?.as_str(),
            None => entry.as_str(),
        })
        .collect();

    (!entries.is_empty()).then(|| format!("{}: {}", label, entries.join(separator)))
}

fn index_metadata(item: &MemoryItem) -> Value {
    let meta = |key: &str| item.pointer(&["metadata", key]).cloned();

    json!({
        "type": item.get("type").cloned().unwrap_or_else(|| json!("handoff")),
        "project": meta("project").unwrap_or_else(|| json!("unknown")),
        "phase": meta("phase").unwrap_or_else(|| json!("")),
        "timestamp": item.get("timestamp").cloned().unwrap_or(Value::Null),
        "compression_ratio": meta("compression_ratio").unwrap_or_else(|| json!(0)),
        "quality_score": meta("quality_score").unwrap_or_else(|| json!(0)),
    })
}
