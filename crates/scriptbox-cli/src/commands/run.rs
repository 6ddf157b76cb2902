//! `scriptbox run` command.
//!
//! Developer mode: the CLI plays the host. The script runs on a real worker;
//! tool calls are answered from a fixture file, log lines are echoed to
//! stderr and the final outcome is printed to stdout as JSON.

use std::path::PathBuf;

use clap::Args;
use futures::channel::mpsc as host_channel;
use serde_json::json;
use tokio::sync::mpsc;

use scriptbox_config::{load_fixtures, ScriptboxConfig, ToolFixtures};
use scriptbox_protocol::EngineMessage;
use scriptbox_runtime::Worker;

use crate::{input, output, shared};

/// Run a script locally.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Path to the script file, or `-` for stdin.
    pub script: String,
    /// JSON file mapping tool names to `{"result": ...}` or `{"error": "..."}`.
    #[arg(short, long)]
    pub tools: Option<PathBuf>,
}

/// Executes the run command.
pub async fn execute(args: &RunArgs, config: &ScriptboxConfig) -> anyhow::Result<()> {
    let code = input::read_script(&args.script)?;
    let fixtures = match &args.tools {
        Some(path) => load_fixtures(path).map_err(|e| {
            output::print_diagnostics(&e);
            anyhow::anyhow!("{e}")
        })?,
        None => ToolFixtures::default(),
    };
    tracing::info!(script = %args.script, tools = fixtures.len(), "running script locally");

    let outcome = run_local(&code, &fixtures, &shared::worker_config(config)).await?;
    let failed = matches!(outcome, EngineMessage::Error { .. });
    output::print_json(&serde_json::to_value(&outcome)?);
    if failed {
        anyhow::bail!("script failed");
    }
    Ok(())
}

/// Runs `code` on a fresh worker and returns its final message.
pub async fn run_local(
    code: &str,
    fixtures: &ToolFixtures,
    worker_config: &scriptbox_runtime::WorkerConfig,
) -> anyhow::Result<EngineMessage> {
    let (to_worker, inbound) = host_channel::unbounded::<String>();
    let (mut outbox, mut from_worker) = mpsc::unbounded_channel();
    let mut worker = Worker::new(worker_config);

    to_worker.unbounded_send(json!({"type": "exec", "code": code}).to_string())?;

    let host = async move {
        while let Some(message) = from_worker.recv().await {
            match message {
                EngineMessage::Log { entry } => output::print_log(&entry),
                EngineMessage::CallTool {
                    request_id,
                    name,
                    params,
                } => {
                    tracing::debug!(tool = %name, %params, "answering tool call from fixtures");
                    let reply = match fixtures.answer(&name) {
                        Ok(result) => {
                            json!({"type": "toolResult", "requestId": request_id, "result": result})
                        }
                        Err(error) => {
                            json!({"type": "toolError", "requestId": request_id, "error": error})
                        }
                    };
                    to_worker.unbounded_send(reply.to_string())?;
                }
                outcome => return Ok(outcome),
            }
        }
        anyhow::bail!("worker stopped without an outcome")
    };

    // The host future owns the worker's input; once it returns, the input
    // closes and the worker stops.
    let (served, outcome) = tokio::join!(worker.serve(inbound, &mut outbox), host);
    served?;
    outcome
}
