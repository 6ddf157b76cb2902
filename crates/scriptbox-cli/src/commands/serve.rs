//! `scriptbox serve` command.
//!
//! Serves the worker protocol over stdin/stdout until stdin closes or
//! ctrl-c is received.

use clap::Args;

use scriptbox_config::ScriptboxConfig;
use scriptbox_runtime::Worker;
use scriptbox_transport_stdio::{StdioTransport, WorkerServer};

use crate::{output, shared};

/// Serve the worker protocol over stdio.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the lifetime log capacity.
    #[arg(long)]
    pub max_log_entries: Option<usize>,
    /// Override the per-run stack budget, in bytes.
    #[arg(long)]
    pub max_stack_size: Option<usize>,
    /// Override the per-run heap budget, in bytes (0 = unbounded).
    #[arg(long)]
    pub max_heap_size: Option<usize>,
}

/// Executes the serve command.
pub async fn execute(args: &ServeArgs, config: &ScriptboxConfig) -> anyhow::Result<()> {
    let mut worker_config = shared::worker_config(config);
    if let Some(max) = args.max_log_entries {
        worker_config.max_log_entries = max;
    }
    if let Some(bytes) = args.max_stack_size {
        worker_config.max_stack_size = bytes;
    }
    if let Some(bytes) = args.max_heap_size {
        worker_config.max_heap_size = bytes;
    }
    tracing::debug!(?worker_config, "worker configuration");

    let transport = StdioTransport::new(tokio::io::stdin(), tokio::io::stdout());
    let server = WorkerServer::new(transport, Worker::new(&worker_config));
    tracing::info!("scriptbox worker ready on stdio");

    tokio::select! {
        result = server.run() => {
            result.map_err(|e| {
                output::print_diagnostics(&e);
                anyhow::anyhow!("server error: {e}")
            })?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    Ok(())
}
