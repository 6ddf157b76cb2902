//! Tool fixtures: canned tool answers for running scripts without a host.
//!
//! A fixture file is a JSON object mapping tool names to either
//! `{"result": <value>}` or `{"error": "<message>"}`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::loader::ConfigError;

/// The canned answer for one tool.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase", deny_unknown_fields)]
pub enum FixtureAnswer {
    /// The tool succeeds with this value.
    Result(Value),
    /// The tool fails with this message.
    Error(String),
}

/// Canned answers keyed by tool name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ToolFixtures {
    tools: BTreeMap<String, FixtureAnswer>,
}

impl ToolFixtures {
    /// Answers a call to `name`; unknown tools fail.
    pub fn answer(&self, name: &str) -> Result<Value, String> {
        match self.tools.get(name) {
            Some(FixtureAnswer::Result(value)) => Ok(value.clone()),
            Some(FixtureAnswer::Error(message)) => Err(message.clone()),
            None => Err(format!("unknown tool '{name}'")),
        }
    }

    /// Names of every tool with a fixture, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Parses fixture JSON.
///
/// # Errors
/// Returns `ConfigError::Fixtures` if the text is not a fixture map.
pub fn parse_fixtures(content: &str) -> Result<ToolFixtures, ConfigError> {
    serde_json::from_str(content).map_err(|e| ConfigError::Fixtures(e.to_string()))
}

/// Reads and parses a fixture file.
///
/// # Errors
/// Returns `ConfigError::Io` if the file cannot be read and
/// `ConfigError::Fixtures` if its content is invalid.
pub fn load_fixtures(path: &Path) -> Result<ToolFixtures, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_fixtures(&content)
}
