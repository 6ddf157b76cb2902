//! The single-flight worker and its control loop.
//!
//! The worker owns the log buffer, the pending-call table and the busy
//! state. Everything that mutates them happens inside [`Worker::serve`]:
//! inbound host messages, bridge requests from the running script, and the
//! completion of the run itself are multiplexed by one `select!`.

use std::rc::Rc;

use futures::future::OptionFuture;
use futures::{Stream, StreamExt};
use scriptbox_protocol::{parse_host_message, EngineMessage, HostMessage};
use scriptbox_types::{CorrelationId, ExecutionOutcome};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::context::{BridgeRequest, CapabilityContext};
use crate::engine::{LangEngine, RunFuture, ScriptEngine};
use crate::error::{RuntimeError, ScriptError};
use crate::log::LogBuffer;
use crate::outbox::Outbox;
use crate::pending::{PendingCalls, ToolAnswer};
use crate::runtime_config::WorkerConfig;

/// Execution engine serving one host channel.
pub struct Worker {
    engine: Rc<dyn ScriptEngine>,
    logs: LogBuffer,
    pending: PendingCalls,
}

impl Worker {
    /// Creates a worker running scripts on the embedded QuickJS runtime.
    pub fn new(config: &WorkerConfig) -> Self {
        Self::with_engine(Rc::new(LangEngine::new(config.limits())), config)
    }

    /// Creates a worker running scripts on `engine`.
    pub fn with_engine(engine: Rc<dyn ScriptEngine>, config: &WorkerConfig) -> Self {
        Self {
            engine,
            logs: LogBuffer::new(config.max_log_entries),
            pending: PendingCalls::new(),
        }
    }

    /// Log entries captured so far.
    pub fn logs(&self) -> &LogBuffer {
        &self.logs
    }

    /// Serves `inbound` lines until the stream ends.
    ///
    /// Each line is one host message; lines that do not decode are ignored.
    /// When the stream ends during a run, the run is abandoned without an
    /// outcome.
    ///
    /// # Errors
    /// Returns `RuntimeError` when `outbox` can no longer deliver messages.
    pub async fn serve<S, O>(&mut self, mut inbound: S, outbox: &mut O) -> Result<(), RuntimeError>
    where
        S: Stream<Item = String> + Unpin,
        O: Outbox + ?Sized,
    {
        let (bridge_tx, mut bridge_rx) = mpsc::unbounded_channel();
        let mut run: Option<RunFuture> = None;
        info!("worker ready");

        let served = loop {
            tokio::select! {
                biased;
                Some(request) = bridge_rx.recv() => {
                    if let Err(e) = self.bridge(request, outbox).await {
                        break Err(e);
                    }
                }
                Some(outcome) = OptionFuture::from(run.as_mut()), if run.is_some() => {
                    run = None;
                    if let Err(e) = self.finish(outcome, &mut bridge_rx, outbox).await {
                        break Err(e);
                    }
                }
                line = inbound.next() => match line {
                    Some(line) => {
                        if let Some(started) = self.dispatch(&line, run.is_some(), &bridge_tx) {
                            run = Some(started);
                        }
                    }
                    None => {
                        if run.take().is_some() {
                            warn!("input closed during a run; abandoning it");
                        }
                        break Ok(());
                    }
                },
            }
        };

        let dropped = self.pending.clear();
        if dropped > 0 {
            debug!(dropped, "discarded pending tool calls on shutdown");
        }
        info!("worker stopped");
        served
    }

    /// Routes one inbound line. Returns the new run when an `exec` starts one.
    fn dispatch(
        &mut self,
        line: &str,
        busy: bool,
        bridge: &mpsc::UnboundedSender<BridgeRequest>,
    ) -> Option<RunFuture> {
        let Some(message) = parse_host_message(line) else {
            debug!("ignoring malformed host message");
            return None;
        };
        match message {
            HostMessage::Exec { code } => {
                if busy {
                    debug!("ignoring exec: a run is already in flight");
                    return None;
                }
                info!(bytes = code.len(), "starting run");
                let context = Rc::new(CapabilityContext::new(bridge.clone()));
                Some(self.engine.run(&code, context))
            }
            HostMessage::ToolResult { request_id, result } => {
                self.answer(&request_id, Ok(result));
                None
            }
            HostMessage::ToolError { request_id, error } => {
                self.answer(&request_id, Err(error));
                None
            }
        }
    }

    fn answer(&mut self, id: &CorrelationId, answer: ToolAnswer) {
        if self.pending.settle(id, answer) {
            trace!(request_id = %id, "tool call settled");
        } else {
            debug!(request_id = %id, "ignoring response for unknown tool call");
        }
    }

    /// Handles one request from the running script.
    async fn bridge<O>(&mut self, request: BridgeRequest, outbox: &mut O) -> Result<(), RuntimeError>
    where
        O: Outbox + ?Sized,
    {
        match request {
            BridgeRequest::CallTool {
                name,
                params,
                reply,
            } => {
                let request_id = self.pending.register(reply);
                trace!(request_id = %request_id, tool = %name, "forwarding tool call");
                outbox
                    .send(EngineMessage::CallTool {
                        request_id,
                        name,
                        params,
                    })
                    .await
            }
            BridgeRequest::Log(entry) => {
                let entry = entry.to_string();
                if !self.logs.push(entry.clone()) {
                    trace!("log buffer full; dropping entry");
                    return Ok(());
                }
                outbox.send(EngineMessage::Log { entry }).await
            }
        }
    }

    /// Flushes the run's remaining requests, posts its outcome and releases
    /// the guard.
    async fn finish<O>(
        &mut self,
        outcome: Result<Option<Value>, ScriptError>,
        bridge_rx: &mut mpsc::UnboundedReceiver<BridgeRequest>,
        outbox: &mut O,
    ) -> Result<(), RuntimeError>
    where
        O: Outbox + ?Sized,
    {
        while let Ok(request) = bridge_rx.try_recv() {
            self.bridge(request, outbox).await?;
        }
        let logs = self.logs.entries().to_vec();
        let outcome = match outcome {
            Ok(result) => {
                info!("run succeeded");
                ExecutionOutcome::Success { result, logs }
            }
            Err(e) => {
                info!(kind = ?e.kind, error = %e.message, "run failed");
                ExecutionOutcome::Failure {
                    error: e.message,
                    logs,
                }
            }
        };
        let abandoned = self.pending.clear();
        if abandoned > 0 {
            debug!(abandoned, "run ended with tool calls outstanding");
        }
        outbox.send(outcome.into()).await
    }
}
