//! Captured log entries.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One captured log line, rendered as `[level] message`.
///
/// Structured fields passed to `mcp.log` are appended to the message as
/// compact JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Level as given by the script (`log`, `warn`, `info`, ...).
    pub level: String,
    /// Fully formatted message text.
    pub message: String,
}

impl LogEntry {
    /// Creates an entry without structured fields.
    pub fn new(level: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            message: message.into(),
        }
    }

    /// Creates an entry, folding optional structured fields into the message.
    pub fn with_fields(
        level: impl Into<String>,
        message: impl Into<String>,
        fields: Option<&Value>,
    ) -> Self {
        let mut message = message.into();
        match fields {
            None | Some(Value::Null) => {}
            Some(fields) => {
                message.push(' ');
                message.push_str(&fields.to_string());
            }
        }
        Self::new(level, message)
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_level_prefix() {
        assert_eq!(LogEntry::new("log", "hi").to_string(), "[log] hi");
    }

    #[test]
    fn appends_fields_as_json() {
        let fields = json!({"user": "ada", "n": 2});
        let entry = LogEntry::with_fields("info", "login", Some(&fields));
        assert_eq!(entry.to_string(), r#"[info] login {"user":"ada","n":2}"#);
    }

    #[test]
    fn null_fields_are_ignored() {
        let entry = LogEntry::with_fields("warn", "x", Some(&Value::Null));
        assert_eq!(entry.to_string(), "[warn] x");
    }
}
