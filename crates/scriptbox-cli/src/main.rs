//! scriptbox CLI - isolated script worker with a tool-call bridge.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use scriptbox_config::LogFormat;

mod commands;
mod input;
mod output;
pub(crate) mod shared;

/// scriptbox - runs host-supplied scripts and bridges their tool calls.
#[derive(Debug, Parser)]
#[command(name = "scriptbox", version, about)]
struct Cli {
    /// Configuration file path.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format: plain or json (defaults to the config value).
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the worker protocol over stdin/stdout.
    Serve(commands::serve::ServeArgs),
    /// Run a script locally, answering tool calls from fixtures.
    Run(commands::run::RunArgs),
    /// Compile a script without running it.
    Check(commands::check::CheckArgs),
}

// Scripts are single-threaded; everything runs on one thread.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = shared::load_config(cli.config.as_deref())?;
    shared::init_tracing(&config.logging, cli.verbose, cli.log_format);

    tracing::debug!(config = ?cli.config, "scriptbox starting");

    match &cli.command {
        Commands::Serve(args) => commands::serve::execute(args, &config).await,
        Commands::Run(args) => commands::run::execute(args, &config).await,
        Commands::Check(args) => commands::check::execute(args),
    }
}
