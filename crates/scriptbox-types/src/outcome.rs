//! The final outcome of one script run.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of a completed run, together with the log lines it captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    /// The script returned normally. `result` is `None` when nothing was
    /// returned explicitly.
    Success {
        result: Option<Value>,
        logs: Vec<String>,
    },
    /// The script failed to compile or raised an uncaught error.
    Failure { error: String, logs: Vec<String> },
}

impl ExecutionOutcome {
    /// Returns `true` for [`ExecutionOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Log lines captured during the run.
    pub fn logs(&self) -> &[String] {
        match self {
            Self::Success { logs, .. } | Self::Failure { logs, .. } => logs,
        }
    }
}
