//! Tagged messages for both directions of the host channel.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use scriptbox_types::{CorrelationId, ExecutionOutcome};

/// Message sent by the host to the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostMessage {
    /// Run a script.
    Exec {
        /// Script source text.
        code: String,
    },
    /// Successful answer to a `callTool`.
    #[serde(rename_all = "camelCase")]
    ToolResult {
        /// Id copied from the matching `callTool`.
        request_id: CorrelationId,
        /// Tool output. A missing field is treated as `null`.
        #[serde(default)]
        result: Value,
    },
    /// Failed answer to a `callTool`.
    #[serde(rename_all = "camelCase")]
    ToolError {
        /// Id copied from the matching `callTool`.
        request_id: CorrelationId,
        /// Error text surfaced to the script.
        error: String,
    },
}

/// Message sent by the worker to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EngineMessage {
    /// One captured log line, streamed as soon as it is recorded.
    Log {
        /// Rendered `[level] message` text.
        entry: String,
    },
    /// Request for the host to run a tool.
    #[serde(rename_all = "camelCase")]
    CallTool {
        /// Fresh id the host must echo back.
        request_id: CorrelationId,
        /// Tool name as given by the script.
        name: String,
        /// Tool parameters.
        params: Value,
    },
    /// Successful end of a run.
    Result {
        /// Returned value; absent when the script returned nothing.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<Value>,
        /// Log lines captured during the run; absent when there were none.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        logs: Option<Vec<String>>,
    },
    /// Failed end of a run.
    Error {
        /// Error message text.
        error: String,
        /// Log lines captured during the run; absent when there were none.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        logs: Option<Vec<String>>,
    },
}

impl EngineMessage {
    /// Serializes the message to a single JSON line (without the newline).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<ExecutionOutcome> for EngineMessage {
    fn from(outcome: ExecutionOutcome) -> Self {
        let batch = |logs: Vec<String>| (!logs.is_empty()).then_some(logs);
        match outcome {
            ExecutionOutcome::Success { result, logs } => Self::Result {
                result,
                logs: batch(logs),
            },
            ExecutionOutcome::Failure { error, logs } => Self::Error {
                error,
                logs: batch(logs),
            },
        }
    }
}

/// Decodes one inbound line.
///
/// Returns `None` for anything that is not a well-formed host message:
/// empty input, invalid JSON, unknown `type`, or missing fields. Callers drop
/// such input without replying.
pub fn parse_host_message(line: &str) -> Option<HostMessage> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    serde_json::from_str(line).ok()
}
