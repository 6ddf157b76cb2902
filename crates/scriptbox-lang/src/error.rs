//! Script engine error types.

use rquickjs::{CaughtError, Coerced};
use scriptbox_types::{DiagnosticError, ErrorKind, ScriptboxError};
use thiserror::Error;

/// Message reported when a script throws something with no usable text.
const UNCAUGHT_FALLBACK: &str = "Uncaught exception";

/// Errors surfaced by compiling or running a script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LangError {
    /// The source text could not be compiled.
    #[error("{message}{}", at_line(.line))]
    Syntax { message: String, line: Option<u32> },
    /// The script threw a value nobody caught.
    #[error("{message}")]
    Uncaught { name: String, message: String },
    /// The engine itself failed (runtime setup, allocation).
    #[error("script engine failure: {0}")]
    Engine(String),
}

fn at_line(line: &Option<u32>) -> String {
    line.map(|line| format!(" (line {line})")).unwrap_or_default()
}

impl LangError {
    /// Classifies an error raised while compiling the source.
    pub(crate) fn compile(caught: CaughtError<'_>) -> Self {
        match caught {
            CaughtError::Exception(exception) => Self::Syntax {
                message: non_empty(exception.message()),
                line: exception.stack().as_deref().and_then(stack_line),
            },
            CaughtError::Value(value) => Self::Syntax {
                message: non_empty(value.get::<Coerced<String>>().ok().map(|s| s.0)),
                line: None,
            },
            CaughtError::Error(e) => Self::Engine(e.to_string()),
        }
    }

    /// Classifies an error that escaped the running script.
    pub(crate) fn uncaught(caught: CaughtError<'_>) -> Self {
        match caught {
            CaughtError::Exception(exception) => Self::Uncaught {
                name: exception
                    .get::<_, Option<String>>("name")
                    .ok()
                    .flatten()
                    .unwrap_or_else(|| "Error".into()),
                message: non_empty(exception.message()),
            },
            CaughtError::Value(value) => Self::Uncaught {
                name: String::new(),
                message: non_empty(value.get::<Coerced<String>>().ok().map(|s| s.0)),
            },
            CaughtError::Error(e) => Self::Engine(e.to_string()),
        }
    }

    pub(crate) fn engine(e: rquickjs::Error) -> Self {
        Self::Engine(e.to_string())
    }

    /// Returns `true` for compile-time errors.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }

    /// Returns `true` when the script ran out of stack or heap.
    pub fn is_exhaustion(&self) -> bool {
        match self {
            Self::Uncaught { name, message } => {
                name == "InternalError"
                    || (name == "RangeError" && message.contains("call stack size"))
            }
            _ => false,
        }
    }
}

fn non_empty(message: Option<String>) -> String {
    match message {
        Some(message) if !message.is_empty() => message,
        _ => UNCAUGHT_FALLBACK.to_string(),
    }
}

/// Extracts the line number from the first frame of an engine stack trace
/// (`at file:line` or `at file:line:column`).
fn stack_line(stack: &str) -> Option<u32> {
    let frame = stack.lines().find_map(|l| l.trim().strip_prefix("at "))?;
    let frame = frame.trim_end_matches(')');
    frame
        .rsplit(':')
        .map_while(|part| part.parse::<u32>().ok())
        .last()
}

impl DiagnosticError for LangError {
    fn hint(&self) -> Option<String> {
        match self {
            Self::Syntax { .. } => Some(
                "The script body is compiled as the inside of an async function; \
                 check for unbalanced brackets or a missing operator near the reported line."
                    .into(),
            ),
            Self::Uncaught { name, message } if name == "ReferenceError" => Some(format!(
                "{message}: only `mcp`, `console` and the standard built-ins are in scope."
            )),
            e if e.is_exhaustion() => {
                Some("The script exhausted its stack or heap budget.".into())
            }
            Self::Uncaught { .. } => None,
            Self::Engine(_) => Some("The embedded engine could not be set up for this run.".into()),
        }
    }

    fn fix(&self) -> Option<String> {
        match self {
            Self::Syntax { .. } => Some("Run `scriptbox check <file>` to validate the script.".into()),
            e if e.is_exhaustion() => Some(
                "Raise `worker.max_stack_size` or `worker.max_heap_size`, \
                 or rewrite deep recursion as a loop."
                    .into(),
            ),
            Self::Uncaught { .. } => {
                Some("Wrap the failing call in try/catch to handle the error in the script.".into())
            }
            Self::Engine(_) => None,
        }
    }
}

impl From<LangError> for ScriptboxError {
    fn from(e: LangError) -> Self {
        let kind = match &e {
            LangError::Syntax { .. } => ErrorKind::Syntax,
            e if e.is_exhaustion() => ErrorKind::ResourceExhausted,
            LangError::Uncaught { .. } => ErrorKind::Script,
            LangError::Engine(_) => ErrorKind::Internal,
        };
        ScriptboxError::new(kind, e.to_string())
    }
}
