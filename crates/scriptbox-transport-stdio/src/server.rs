//! Worker server over the stdio transport.
//!
//! Reads host messages line by line, feeds them to the worker, and writes
//! the worker's messages back. EOF on the input shuts the server down.

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::info;

use scriptbox_runtime::Worker;

use crate::error::TransportError;
use crate::transport::StdioTransport;

/// Server that connects one transport to one worker.
pub struct WorkerServer<R, W> {
    transport: StdioTransport<R, W>,
    worker: Worker,
}

impl<R, W> WorkerServer<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a new server with the given transport and worker.
    pub fn new(transport: StdioTransport<R, W>, worker: Worker) -> Self {
        Self { transport, worker }
    }

    /// Runs the server until the input is closed.
    ///
    /// A run still in flight at EOF is abandoned without an outcome.
    ///
    /// # Errors
    /// Returns `TransportError::Worker` when output can no longer be written.
    pub async fn run(self) -> Result<Worker, TransportError> {
        let Self {
            transport,
            mut worker,
        } = self;
        info!("scriptbox worker starting on stdio");
        let (lines, mut writer) = transport.into_parts();
        worker.serve(lines, &mut writer).await?;
        info!("stdin closed, shutting down");
        Ok(worker)
    }
}
