//! Runtime configuration.
//!
//! Values are read once at startup by the CLI, which takes each setting from
//! a flag or from the environment variable named here.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{IssueDefaults, RegistryError, StreamRegistry};

/// Environment variable names.
pub const ENV_MODE: &str = "BUILD_TRIGGER_MODE";
pub const ENV_JIRA_URL: &str = "JIRA_URL";
pub const ENV_JIRA_KEY: &str = "JIRA_KEY";
pub const ENV_PUBLISH_URL: &str = "BUILD_TRIGGER_PUBLISH_URL";
pub const ENV_STREAMS_FILE: &str = "BUILD_TRIGGER_STREAMS_FILE";
pub const ENV_CC: &str = "BUILD_TRIGGER_CC";

/// Default issue tracker base URL.
pub const DEFAULT_JIRA_URL: &str = "https://issues.redhat.com";

/// Errors in configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown execution mode '{0}' (expected prod, dev or test)")]
    InvalidMode(String),

    #[error("stream registry: {0}")]
    Registry(#[from] RegistryError),
}

/// Whether outbound side effects are real.
///
/// Only `Production` creates tracker issues; the other modes log the batch
/// instead, so tests and local runs never file real issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Production,
    #[default]
    Development,
    Test,
}

impl ExecutionMode {
    pub fn is_production(&self) -> bool {
        matches!(self, ExecutionMode::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Production => "prod",
            ExecutionMode::Development => "dev",
            ExecutionMode::Test => "test",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Ok(ExecutionMode::Production),
            "dev" | "development" => Ok(ExecutionMode::Development),
            "test" => Ok(ExecutionMode::Test),
            other => Err(ConfigError::InvalidMode(other.to_string())),
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Execution mode gating real issue creation.
    pub mode: ExecutionMode,

    /// Issue tracker base URL.
    pub jira_url: String,

    /// Bearer token for the issue tracker.
    pub jira_key: Option<String>,

    /// Build system endpoint receiving trigger events (logged when unset).
    pub publish_url: Option<String>,

    /// JSON file replacing the compiled-in stream table.
    pub streams_file: Option<PathBuf>,

    /// Tracker usernames copied on every issue.
    pub cc: Vec<String>,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::default(),
            jira_url: DEFAULT_JIRA_URL.to_string(),
            jira_key: None,
            publish_url: None,
            streams_file: None,
            cc: Vec::new(),
        }
    }
}

impl TriggerConfig {
    /// Load the stream registry: the configured file, or the built-in table.
    pub fn load_registry(&self) -> Result<Arc<StreamRegistry>, ConfigError> {
        let registry = match &self.streams_file {
            Some(path) => StreamRegistry::from_json_file(path)?,
            None => StreamRegistry::builtin().clone(),
        };
        Ok(Arc::new(registry))
    }

    /// Issue constants with the configured carbon-copy list.
    pub fn issue_defaults(&self) -> IssueDefaults {
        IssueDefaults::default().with_cc(self.cc.clone())
    }
}

/// Split a comma-separated list of usernames, dropping blanks.
pub fn parse_cc_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("prod".parse::<ExecutionMode>().unwrap(), ExecutionMode::Production);
        assert_eq!("Production".parse::<ExecutionMode>().unwrap(), ExecutionMode::Production);
        assert_eq!(" dev ".parse::<ExecutionMode>().unwrap(), ExecutionMode::Development);
        assert_eq!("test".parse::<ExecutionMode>().unwrap(), ExecutionMode::Test);
        assert!(matches!(
            "staging".parse::<ExecutionMode>(),
            Err(ConfigError::InvalidMode(m)) if m == "staging"
        ));
    }

    #[test]
    fn test_only_production_is_production() {
        assert!(ExecutionMode::Production.is_production());
        assert!(!ExecutionMode::Development.is_production());
        assert!(!ExecutionMode::Test.is_production());
    }

    #[test]
    fn test_default_mode_is_not_production() {
        assert!(!TriggerConfig::default().mode.is_production());
    }

    #[test]
    fn test_parse_cc_list() {
        assert_eq!(parse_cc_list("alice, bob,,  "), vec!["alice", "bob"]);
        assert!(parse_cc_list("").is_empty());
    }

    #[test]
    fn test_load_registry_defaults_to_builtin() {
        let registry = TriggerConfig::default().load_registry().expect("registry");
        assert_eq!(registry.len(), StreamRegistry::builtin().len());
    }

    #[test]
    fn test_load_registry_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("streams.json");
        std::fs::write(
            &path,
            r#"[{"humanLabel": "Next", "machineLabel": "next", "titlePrefix": "(n)", "targetRelease": "1"}]"#,
        )
        .expect("write");

        let config = TriggerConfig {
            streams_file: Some(path),
            ..TriggerConfig::default()
        };
        let registry = config.load_registry().expect("registry");
        assert_eq!(registry.len(), 1);
        assert!(registry.resolve("next").is_ok());
    }

    #[test]
    fn test_issue_defaults_carry_cc() {
        let config = TriggerConfig {
            cc: vec!["alice".to_string()],
            ..TriggerConfig::default()
        };
        assert_eq!(config.issue_defaults().cc, vec!["alice"]);
    }
}
