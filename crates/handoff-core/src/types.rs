//! Handoff request and outcome types

use handoff_compress::CompressedContext;
use handoff_storage::{Capability, MemoryItem};
use serde::{Deserialize, Serialize};

/// A task carried over to the next session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    #[serde(alias = "task")]
    pub content: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(rename = "activeForm", default, skip_serializing_if = "Option::is_none")]
    pub active_form: Option<String>,
}

fn default_status() -> String {
    "pending".to_string()
}

impl Todo {
    pub fn new(content: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            status: status.into(),
            active_form: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }
}

/// Everything needed to package one session for handoff
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandoffRequest {
    pub conversation: String,
    pub todos: Vec<Todo>,
    pub project: Option<String>,
    pub phase: Option<String>,
    /// Session token usage as reported by the host; estimated from the
    /// conversation when absent
    pub current_tokens: Option<usize>,
}

impl HandoffRequest {
    pub fn new(conversation: impl Into<String>) -> Self {
        Self {
            conversation: conversation.into(),
            ..Self::default()
        }
    }

    pub fn with_todos(mut self, todos: Vec<Todo>) -> Self {
        self.todos = todos;
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = Some(phase.into());
        self
    }
}

/// Result of a completed handoff
#[derive(Debug, Clone)]
pub struct HandoffOutcome {
    pub memory_id: String,
    pub item: MemoryItem,
    pub context: CompressedContext,
    pub capability: Capability,
}
