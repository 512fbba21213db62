//! Cinedeck CLI - Command-line interface
//!
//! Browse trending titles, search and look up details from the terminal,
//! or start the API server.

mod commands;
mod output;

use clap::Parser;
use cinedeck_core::RuntimeMode;
use cinedeck_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "cinedeck")]
#[command(about = "Movie and TV browsing over the TMDB API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,

    /// Runtime mode: production uses the TMDB API, development the demo catalog
    #[arg(long, value_enum, default_value = "production", global = true)]
    mode: RuntimeMode,

    /// Console log level (the log file always records everything)
    #[arg(long, value_enum, default_value_t = CliLogLevel::Warn, global = true)]
    log_level: CliLogLevel,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_tracing_level(), None)?;

    commands::handle_command(cli.command, cli.mode).await
}
