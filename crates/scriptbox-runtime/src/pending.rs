//! Outstanding tool calls keyed by correlation id.

use std::collections::HashMap;

use scriptbox_types::CorrelationId;
use serde_json::Value;
use tokio::sync::oneshot;

/// Answer delivered to a waiting tool call: the result, or the host's error text.
pub type ToolAnswer = Result<Value, String>;

/// Table of tool calls waiting for a host response.
#[derive(Debug, Default)]
pub struct PendingCalls {
    calls: HashMap<CorrelationId, oneshot::Sender<ToolAnswer>>,
}

impl PendingCalls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a call under a freshly minted id.
    pub fn register(&mut self, reply: oneshot::Sender<ToolAnswer>) -> CorrelationId {
        let id = CorrelationId::generate();
        self.calls.insert(id.clone(), reply);
        id
    }

    /// Settles the call registered under `id`, consuming it.
    ///
    /// Returns `false` when no such call is outstanding. A call whose waiter
    /// has already gone still counts as settled.
    pub fn settle(&mut self, id: &CorrelationId, answer: ToolAnswer) -> bool {
        match self.calls.remove(id) {
            Some(reply) => {
                let _ = reply.send(answer);
                true
            }
            None => false,
        }
    }

    /// Drops every outstanding call without answering it.
    pub fn clear(&mut self) -> usize {
        let dropped = self.calls.len();
        self.calls.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}
