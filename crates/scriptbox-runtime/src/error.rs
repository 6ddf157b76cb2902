//! Runtime-specific error types.

use scriptbox_lang::LangError;
use scriptbox_types::{DiagnosticError, ErrorKind, ScriptboxError};
use thiserror::Error;

/// Errors that stop the worker itself.
///
/// Script failures are not among them: those become `error` outcomes and
/// the worker keeps serving.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The host side of the channel went away.
    #[error("host channel closed")]
    ChannelClosed,
    /// An outbound message could not be written.
    #[error("failed to deliver message: {0}")]
    Delivery(String),
}

impl From<RuntimeError> for ScriptboxError {
    fn from(e: RuntimeError) -> Self {
        ScriptboxError::new(ErrorKind::Channel, e.to_string())
    }
}

impl DiagnosticError for RuntimeError {
    fn hint(&self) -> Option<String> {
        match self {
            Self::ChannelClosed => {
                Some("The host stopped reading the worker's output before the run finished.".into())
            }
            Self::Delivery(_) => Some("Writing to stdout failed.".into()),
        }
    }

    fn fix(&self) -> Option<String> {
        match self {
            Self::ChannelClosed => {
                Some("Keep the worker's stdout open until the final result arrives.".into())
            }
            Self::Delivery(_) => None,
        }
    }
}

/// A failed run, as reported to the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ScriptError {
    /// How the script failed.
    pub kind: ErrorKind,
    /// Message text sent in the `error` outcome.
    pub message: String,
}

impl ScriptError {
    /// Creates a script error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<LangError> for ScriptError {
    fn from(e: LangError) -> Self {
        let domain = ScriptboxError::from(e);
        Self::new(domain.kind, domain.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_closed_maps_to_channel_kind() {
        let err: ScriptboxError = RuntimeError::ChannelClosed.into();
        assert_eq!(err.kind, ErrorKind::Channel);
        assert!(RuntimeError::ChannelClosed.fix().is_some());
    }

    #[test]
    fn syntax_errors_keep_their_position() {
        let err: ScriptError = scriptbox_lang::compile("return )")
            .expect_err("should not compile")
            .into();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.message.ends_with("(line 1)"), "{}", err.message);
    }

    #[test]
    fn uncaught_errors_report_the_message() {
        let err: ScriptError = LangError::Uncaught {
            name: "Error".into(),
            message: "boom".into(),
        }
        .into();
        assert_eq!(err.kind, ErrorKind::Script);
        assert_eq!(err.to_string(), "boom");
    }
}
