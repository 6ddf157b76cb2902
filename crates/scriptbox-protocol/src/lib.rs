//! # scriptbox-protocol
//!
//! Message definitions for the host/worker channel.
//! Every message is a JSON object tagged by its `type` field; the
//! stdio transport carries one message per line.

pub mod message;

pub use message::{parse_host_message, EngineMessage, HostMessage};
