mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use handoff_storage::QueryFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries JSON output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Compress {
            input,
            output,
            legacy,
        } => commands::compress::run(&input, output.as_deref(), legacy),
        Commands::Run {
            input,
            todos,
            project,
            phase,
            current_tokens,
        } => commands::run::run(
            config,
            commands::run::RunArgs {
                input: &input,
                todos: todos.as_deref(),
                project,
                phase,
                current_tokens,
            },
        ),
        Commands::Retrieve { id } => commands::retrieve::run(config, &id),
        Commands::Search {
            query,
            limit,
            project,
            expert,
        } => commands::search::run(
            config,
            &query,
            limit,
            &QueryFilter {
                expert,
                project,
            },
        ),
        Commands::Recommend {
            context,
            limit,
            min_quality,
        } => commands::recommend::run(config, &context, limit, min_quality),
        Commands::Status => commands::status::run(config),
    }
}
