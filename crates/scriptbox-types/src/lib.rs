//! # scriptbox-types
//!
//! Domain types for the scriptbox worker.
//! This crate contains plain data types with no runtime behaviour
//! (serde for serialization, uuid for correlation ids).

pub mod correlation;
pub mod error;
pub mod log;
pub mod outcome;

// Re-exports for convenience.
pub use correlation::CorrelationId;
pub use error::{DiagnosticError, ErrorKind, ScriptboxError};
pub use log::LogEntry;
pub use outcome::ExecutionOutcome;
