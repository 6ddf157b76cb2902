//! # scriptbox-config
//!
//! Configuration management for scriptbox.
//! Supports layered config: defaults -> file -> env vars, plus the tool
//! fixture files used by `scriptbox run`.

pub mod fixtures;
pub mod loader;
pub mod schema;

pub use fixtures::{load_fixtures, parse_fixtures, FixtureAnswer, ToolFixtures};
pub use loader::{load_config, ConfigError};
pub use schema::{LogFormat, LoggingConfig, ScriptboxConfig, WorkerSettings};
