//! Destinations for engine messages.

use async_trait::async_trait;
use scriptbox_protocol::EngineMessage;
use tokio::sync::mpsc;

use crate::error::RuntimeError;

/// Where the worker posts its outbound messages.
#[async_trait(?Send)]
pub trait Outbox {
    /// Delivers one message. Messages must reach the host in call order.
    async fn send(&mut self, message: EngineMessage) -> Result<(), RuntimeError>;
}

/// Collects messages in memory.
#[async_trait(?Send)]
impl Outbox for Vec<EngineMessage> {
    async fn send(&mut self, message: EngineMessage) -> Result<(), RuntimeError> {
        self.push(message);
        Ok(())
    }
}

#[async_trait(?Send)]
impl Outbox for mpsc::UnboundedSender<EngineMessage> {
    async fn send(&mut self, message: EngineMessage) -> Result<(), RuntimeError> {
        mpsc::UnboundedSender::send(self, message).map_err(|_| RuntimeError::ChannelClosed)
    }
}
