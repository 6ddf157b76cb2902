//! The capability context handed to each run.
//!
//! A run never touches worker state directly: every request is queued on
//! the bridge channel and handled by the worker's control loop, in order.

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use scriptbox_lang::Capabilities;
use scriptbox_types::LogEntry;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::pending::ToolAnswer;

/// A request from a running script to the worker.
#[derive(Debug)]
pub enum BridgeRequest {
    /// Forward a tool call to the host and answer through `reply`.
    CallTool {
        name: String,
        params: Value,
        reply: oneshot::Sender<ToolAnswer>,
    },
    /// Record a log entry.
    Log(LogEntry),
}

/// [`Capabilities`] implementation that forwards everything over the bridge.
#[derive(Debug, Clone)]
pub struct CapabilityContext {
    bridge: mpsc::UnboundedSender<BridgeRequest>,
}

impl CapabilityContext {
    pub fn new(bridge: mpsc::UnboundedSender<BridgeRequest>) -> Self {
        Self { bridge }
    }
}

impl Capabilities for CapabilityContext {
    fn call_tool(&self, name: &str, params: Value) -> LocalBoxFuture<'static, ToolAnswer> {
        let (reply, answer) = oneshot::channel();
        let queued = self
            .bridge
            .send(BridgeRequest::CallTool {
                name: name.to_string(),
                params,
                reply,
            })
            .is_ok();
        async move {
            if !queued {
                return Err("worker is shutting down".to_string());
            }
            answer
                .await
                .unwrap_or_else(|_| Err("tool call abandoned".to_string()))
        }
        .boxed_local()
    }

    fn log(&self, entry: LogEntry) {
        if self.bridge.send(BridgeRequest::Log(entry)).is_err() {
            tracing::debug!("log entry dropped: worker is shutting down");
        }
    }
}
