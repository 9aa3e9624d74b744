use anyhow::Context;
use handoff_core::{HandoffRequest, Orchestrator, Todo};
use std::path::Path;

pub struct RunArgs<'a> {
    pub input: &'a Path,
    pub todos: Option<&'a Path>,
    pub project: Option<String>,
    pub phase: Option<String>,
    pub current_tokens: Option<usize>,
}

pub fn run(config: Option<&Path>, args: RunArgs<'_>) -> anyhow::Result<()> {
    let todos: Vec<Todo> = match args.todos {
        Some(path) => serde_json::from_str(&super::read_input(path)?)
            .with_context(|| format!("invalid todo list in {}", path.display()))?,
        None => Vec::new(),
    };

    let request = HandoffRequest {
        conversation: super::read_input(args.input)?,
        todos,
        project: args.project,
        phase: args.phase,
        current_tokens: args.current_tokens,
    };

    let orchestrator = Orchestrator::new(super::open_storage(config)?);
    let outcome = orchestrator.run(&request)?;
    let meta = &outcome.context.compression_metadata;

    let output = serde_json::json!({
        "memory_id": outcome.memory_id,
        "backend": outcome.capability,
        "token_before": outcome.item.pointer(&["metadata", "token_before"]),
        "token_after": meta.compressed_tokens,
        "compression_ratio": meta.compression_rate,
    });
    println!("{output}");
    Ok(())
}
