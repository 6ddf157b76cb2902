//! Transport-layer error types.

use scriptbox_runtime::RuntimeError;
use scriptbox_types::{DiagnosticError, ErrorKind, ScriptboxError};
use thiserror::Error;

/// Errors from the stdio transport layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to write to stdout.
    #[error("write error: {0}")]
    Write(String),
    /// The reading end of stdout is gone.
    #[error("stdout closed")]
    Closed,
    /// The worker stopped serving.
    #[error("worker error: {0}")]
    Worker(#[from] RuntimeError),
}

impl From<TransportError> for ScriptboxError {
    fn from(e: TransportError) -> Self {
        ScriptboxError::new(ErrorKind::Channel, e.to_string())
    }
}

impl DiagnosticError for TransportError {
    fn hint(&self) -> Option<String> {
        match self {
            Self::Write(_) => Some("stdout is not writable.".into()),
            Self::Closed => Some("The host closed the worker's stdout.".into()),
            Self::Worker(e) => e.hint(),
        }
    }

    fn fix(&self) -> Option<String> {
        match self {
            Self::Write(_) | Self::Closed => {
                Some("Make sure the host keeps reading the worker's stdout.".into())
            }
            Self::Worker(e) => e.fix(),
        }
    }
}
