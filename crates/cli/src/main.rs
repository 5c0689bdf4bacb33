mod cli;
mod commands;

use clap::Parser;

use crate::cli::Commands;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Sync {
            versions_file,
            read_concurrency,
            write_concurrency,
        } => commands::sync::run(versions_file, read_concurrency, write_concurrency).await,
        Commands::Validate { files } => commands::validate::run_files(&files),
        Commands::Check { root } => commands::validate::run_check(&root),
    }
}
