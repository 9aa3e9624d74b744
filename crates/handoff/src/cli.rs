use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "handoff")]
#[command(version)]
#[command(about = "Compress coding-session transcripts into handoff memories")]
pub struct Cli {
    /// Storage config (defaults to ~/.handoff/storage.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compress a transcript and print the structured context
    Compress {
        /// Transcript file, or `-` for stdin
        #[arg(short, long)]
        input: PathBuf,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Use the simpler extraction limits
        #[arg(long)]
        legacy: bool,
    },

    /// Compress, store and report a full handoff
    Run {
        /// Transcript file, or `-` for stdin
        #[arg(short, long)]
        input: PathBuf,

        /// JSON array of todos
        #[arg(long)]
        todos: Option<PathBuf>,

        #[arg(long)]
        project: Option<String>,

        #[arg(long)]
        phase: Option<String>,

        /// Session token usage reported by the host
        #[arg(long)]
        current_tokens: Option<usize>,
    },

    /// Print a stored memory by id
    Retrieve { id: String },

    /// Search stored memories (empty on the basic backend)
    Search {
        query: String,

        #[arg(short, long, default_value_t = 5)]
        limit: usize,

        /// Only memories from this project
        #[arg(long)]
        project: Option<String>,

        /// Only memories recorded by this expert
        #[arg(long)]
        expert: Option<String>,
    },

    /// Recommend related memories above a quality score
    Recommend {
        /// What you are working on now
        context: String,

        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Minimum quality score (0-100)
        #[arg(long, default_value_t = 60)]
        min_quality: u32,
    },

    /// Show which backend is active and whether it is healthy
    Status,
}
