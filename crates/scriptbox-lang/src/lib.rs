//! # scriptbox-lang
//!
//! Binds scripts to an embedded QuickJS engine. A script is the body of an
//! async function: it may `await` and `return`, and it reaches the outside
//! world only through the `mcp` and `console` globals, both backed by a host
//! that implements [`Capabilities`].
//!
//! Every run gets a fresh runtime with its own stack and heap limits, so no
//! state survives between runs.

pub mod error;
pub mod host;
mod script;

pub use error::LangError;
pub use host::Capabilities;
pub use script::{compile, Limits, Script, DEFAULT_MAX_HEAP_SIZE, DEFAULT_MAX_STACK_SIZE};
