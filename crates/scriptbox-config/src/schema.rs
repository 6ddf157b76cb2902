//! Configuration schema types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Top-level scriptbox configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptboxConfig {
    /// Worker limits.
    #[serde(default)]
    pub worker: WorkerSettings,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Worker limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSettings {
    /// Log entries accepted over the worker's lifetime.
    #[serde(default = "default_max_log_entries")]
    pub max_log_entries: usize,
    /// Native stack budget of one run, in bytes.
    #[serde(default = "default_max_stack_size")]
    pub max_stack_size: usize,
    /// Heap budget of one run, in bytes (0 = unbounded).
    #[serde(default = "default_max_heap_size")]
    pub max_heap_size: usize,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            max_log_entries: default_max_log_entries(),
            max_stack_size: default_max_stack_size(),
            max_heap_size: default_max_heap_size(),
        }
    }
}

fn default_max_log_entries() -> usize {
    1000
}
fn default_max_stack_size() -> usize {
    1024 * 1024
}
fn default_max_heap_size() -> usize {
    64 * 1024 * 1024
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "scriptbox_runtime=trace").
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format of diagnostics on stderr.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Diagnostic output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Plain,
    /// One JSON object per line.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plain => "plain",
            Self::Json => "json",
        })
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected plain or json)")),
        }
    }
}
