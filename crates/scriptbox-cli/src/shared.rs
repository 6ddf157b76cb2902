//! Helpers shared by several commands.

use std::path::Path;

use scriptbox_config::{LogFormat, LoggingConfig, ScriptboxConfig};
use scriptbox_runtime::WorkerConfig;
use tracing_subscriber::EnvFilter;

use crate::output;

/// Loads the layered configuration, printing diagnostics on failure.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ScriptboxConfig> {
    scriptbox_config::load_config(path).map_err(|e| {
        output::print_diagnostics(&e);
        anyhow::anyhow!("{e}")
    })
}

/// Worker settings taken from the configuration.
pub fn worker_config(config: &ScriptboxConfig) -> WorkerConfig {
    WorkerConfig {
        max_log_entries: config.worker.max_log_entries,
        max_stack_size: config.worker.max_stack_size,
        max_heap_size: config.worker.max_heap_size,
    }
}

/// Filter directive: `-v` flags win over the configured level.
pub fn filter_directive(logging: &LoggingConfig, verbose: u8) -> String {
    match verbose {
        0 => logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Installs the global subscriber. Diagnostics always go to stderr: stdout
/// carries the protocol.
pub fn init_tracing(logging: &LoggingConfig, verbose: u8, format: Option<LogFormat>) {
    let directive = filter_directive(logging, verbose);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format.unwrap_or(logging.format) {
        LogFormat::Json => builder.json().with_target(true).init(),
        LogFormat::Plain => builder.init(),
    }
}
