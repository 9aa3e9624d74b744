#![allow(dead_code)]

use handoff_storage::{BackendConfig, StorageConfig, StorageKind};
use serde_json::json;

pub const LOGIN_SESSION: &str =
    "User: Implement login feature\nCreated: auth.py\ndef authenticate_user():\n    pass";

pub fn temp_config(dir: &tempfile::TempDir, kind: StorageKind) -> StorageConfig {
    StorageConfig {
        kind,
        full: BackendConfig::new(dir.path().join("vectors").join("memory")),
        basic: BackendConfig::new(dir.path().join("memory")),
    }
}

pub fn sample_item(id: &str) -> handoff_storage::MemoryItem {
    handoff_storage::MemoryItem::new(id)
        .with("type", json!("handoff"))
        .with("timestamp", json!("2025-01-01T00:00:00Z"))
        .with(
            "session_memory",
            json!({
                "sessionIntent": ["Implement login feature"],
                "playByPlay": ["Created: src/auth.py"],
                "artifacts": ["src/auth.py"],
                "breadcrumbs": ["function:authenticate_user"],
                "todos": [{"content": "Add logout", "status": "pending"}],
                "decisions": []
            }),
        )
        .with("metadata", json!({"project": "portal", "compression_ratio": 0.5}))
}

/// A long synthetic transcript mixing every kind of signal line
pub fn synthetic_transcript(lines: usize) -> String {
    let mut text = String::new();
    for i in 0..lines {
        let line = match i % 8 {
            0 => format!("User: Please keep working on milestone number {}", i),
            1 => format!("Created: src/module_{}/handler.rs", i),
            2 => format!("def handler_{}(request):", i),
            3 => format!("class Service{}:", i),
            4 => format!("import package_{}", i),
            5 => "Assistant: looking into it".to_string(),
            6 => format!("Fixed: off-by-one in parser step {}", i),
            _ => "    return None".to_string(),
        };
        text.push_str(&line);
        text.push('\n');
    }
    text
}
