//! # scriptbox-runtime
//!
//! The execution engine behind `scriptbox serve`.
//! A [`Worker`] reads host messages, runs at most one script at a time,
//! bridges the script's tool calls to the host by correlation id and
//! captures its log output into a bounded buffer.
//!
//! Scripts run on a [`ScriptEngine`]; [`LangEngine`] runs them on the
//! embedded QuickJS runtime.

pub mod context;
pub mod engine;
pub mod error;
pub mod log;
pub mod outbox;
pub mod pending;
pub mod runtime_config;
pub mod worker;

pub use context::{BridgeRequest, CapabilityContext};
pub use engine::{LangEngine, RunFuture, ScriptEngine};
pub use error::{RuntimeError, ScriptError};
pub use log::LogBuffer;
pub use outbox::Outbox;
pub use pending::{PendingCalls, ToolAnswer};
pub use runtime_config::{WorkerConfig, DEFAULT_MAX_LOG_ENTRIES};
pub use worker::Worker;
