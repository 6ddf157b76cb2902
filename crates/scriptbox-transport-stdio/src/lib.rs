//! # scriptbox-transport-stdio
//!
//! Stdio transport adapter for the scriptbox worker.
//!
//! Provides line-delimited JSON transport over stdin/stdout,
//! and a server loop that ties it to a [`Worker`].

pub mod error;
pub mod server;
pub mod transport;

pub use error::TransportError;
// Worker lives in scriptbox-runtime; re-exported for convenience.
pub use scriptbox_runtime::{Worker, WorkerConfig};
pub use server::WorkerServer;
pub use transport::{InboundLines, LineWriter, StdioTransport};
