//! Configuration for persistence, the interactive shell and logging
//!
//! Every section is optional in the YAML source and falls back to defaults.
//!
//! ```yaml
//! persistence:
//!   unsupported_fields: reject
//!   pretty: true
//!   verify_integrity: false
//! shell:
//!   prompt: "atlas> "
//! logging:
//!   level: debug
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtlasConfig {
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub shell: ShellConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AtlasConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }
}

/// What to do with a field the document format cannot represent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsupportedFieldPolicy {
    /// Write a placeholder, flag it, and log a warning
    #[default]
    Truncate,
    /// Fail the save
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub unsupported_fields: UnsupportedFieldPolicy,
    /// Indent the saved document
    pub pretty: bool,
    /// Refuse to save a graph that fails its invariant checks
    pub verify_integrity: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            unsupported_fields: UnsupportedFieldPolicy::Truncate,
            pretty: true,
            verify_integrity: false,
        }
    }
}

impl PersistenceConfig {
    pub fn strict() -> Self {
        Self {
            unsupported_fields: UnsupportedFieldPolicy::Reject,
            verify_integrity: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub prompt: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "atlas> ".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Max level for the fmt subscriber: error, warn, info, debug or trace
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        assert_eq!(AtlasConfig::from_yaml_str("").unwrap(), AtlasConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = AtlasConfig::from_yaml_str(
            "persistence:\n  unsupported_fields: reject\nlogging:\n  level: debug\n",
        )
        .unwrap();

        assert_eq!(config.persistence.unsupported_fields, UnsupportedFieldPolicy::Reject);
        assert!(config.persistence.pretty);
        assert!(!config.persistence.verify_integrity);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.shell.prompt, "atlas> ");
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let result = AtlasConfig::from_yaml_str("persistence:\n  unsupported_fields: drop\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.yaml");
        fs::write(&path, "shell:\n  prompt: \"coffee> \"\n").unwrap();

        let config = AtlasConfig::from_file(&path).unwrap();
        assert_eq!(config.shell.prompt, "coffee> ");

        let missing = AtlasConfig::from_file(dir.path().join("missing.yaml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
