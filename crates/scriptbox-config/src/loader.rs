//! Configuration loader (file + env merge).

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use scriptbox_types::{DiagnosticError, ErrorKind, ScriptboxError};
use thiserror::Error;

use crate::schema::ScriptboxConfig;

/// Environment variable prefix; nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "SCRIPTBOX_";

/// Errors from configuration and fixture loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to load or merge configuration.
    #[error("configuration error: {0}")]
    Load(String),
    /// A referenced file could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// A fixture file is not valid.
    #[error("invalid tool fixtures: {0}")]
    Fixtures(String),
}

impl From<ConfigError> for ScriptboxError {
    fn from(e: ConfigError) -> Self {
        ScriptboxError::new(ErrorKind::InvalidInput, e.to_string())
    }
}

impl DiagnosticError for ConfigError {
    fn hint(&self) -> Option<String> {
        match self {
            Self::Load(_) => Some(
                "The config file or a SCRIPTBOX_* environment variable has an unknown key \
                 or a value of the wrong type."
                    .into(),
            ),
            Self::Io { path, .. } => Some(format!("'{path}' does not exist or is not readable.")),
            Self::Fixtures(_) => Some(
                "Fixtures map each tool name to {\"result\": <value>} or {\"error\": \"<message>\"}."
                    .into(),
            ),
        }
    }

    fn fix(&self) -> Option<String> {
        match self {
            Self::Load(_) => Some(
                "Valid keys:\n  [worker]\n  max_log_entries = 1000\n  max_stack_size = 1048576\n  \
                 max_heap_size = 67108864\n  \
                 [logging]\n  level = \"info\"\n  format = \"plain\""
                    .into(),
            ),
            Self::Io { .. } => Some("Check the path passed on the command line.".into()),
            Self::Fixtures(_) => None,
        }
    }
}

/// Loads configuration by merging layers:
/// 1. Default values
/// 2. Config file (if given)
/// 3. Environment variables (`SCRIPTBOX_WORKER__MAX_CALL_DEPTH=64`)
///
/// # Errors
/// Returns `ConfigError::Io` if the file cannot be read and
/// `ConfigError::Load` if any layer holds an unknown key or a bad value.
pub fn load_config(config_path: Option<&Path>) -> Result<ScriptboxConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(ScriptboxConfig::default()));

    if let Some(path) = config_path {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        figment = figment.merge(Toml::string(&content));
    }

    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    figment
        .extract()
        .map_err(|e| ConfigError::Load(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_without_file() {
        figment::Jail::expect_with(|_| {
            let config = load_config(None).expect("defaults load");
            assert_eq!(config, ScriptboxConfig::default());
            Ok(())
        });
    }

    #[test]
    fn file_overrides_defaults() {
        figment::Jail::expect_with(|_| {
            let mut file = tempfile::NamedTempFile::new().expect("temp file");
            writeln!(file, "[worker]\nmax_stack_size = 65536\n\n[logging]\nformat = \"json\"")
                .expect("write");
            let config = load_config(Some(file.path())).expect("file loads");
            assert_eq!(config.worker.max_stack_size, 65536);
            assert_eq!(config.worker.max_log_entries, 1000);
            assert_eq!(config.logging.format, crate::LogFormat::Json);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SCRIPTBOX_WORKER__MAX_LOG_ENTRIES", "5");
            jail.set_env("SCRIPTBOX_LOGGING__LEVEL", "debug");
            let mut file = tempfile::NamedTempFile::new().expect("temp file");
            writeln!(file, "[worker]\nmax_log_entries = 50").expect("write");
            let config = load_config(Some(file.path())).expect("env loads");
            assert_eq!(config.worker.max_log_entries, 5);
            assert_eq!(config.logging.level, "debug");
            Ok(())
        });
    }

    #[test]
    fn unknown_top_level_key_is_rejected() {
        figment::Jail::expect_with(|_| {
            let mut file = tempfile::NamedTempFile::new().expect("temp file");
            writeln!(file, "[sandbox]\nmemory = 1").expect("write");
            let err = load_config(Some(file.path())).expect_err("unknown key");
            assert!(matches!(err, ConfigError::Load(_)));
            assert!(err.fix().is_some());
            Ok(())
        });
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_config(Some(Path::new("/nonexistent/scriptbox.toml")))
            .expect_err("missing file");
        assert!(matches!(err, ConfigError::Io { .. }));
        let domain: ScriptboxError = err.into();
        assert_eq!(domain.kind, ErrorKind::InvalidInput);
    }
}
