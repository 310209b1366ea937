//! Table manager configuration
//!
//! Loaded from a JSON file, with environment variables taking precedence.

use crate::types::LogLevel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const ENV_STRICT_SCHEMA: &str = "KVCATALOG_STRICT_SCHEMA";
pub const ENV_DROP_ATTRIBUTE: &str = "KVCATALOG_DROP_ATTRIBUTE";
pub const ENV_STORE_FAILURE_POLICY: &str = "KVCATALOG_STORE_FAILURE_POLICY";
pub const ENV_SNAPSHOT_PATH: &str = "KVCATALOG_SNAPSHOT_PATH";
pub const ENV_LOG_LEVEL: &str = "KVCATALOG_LOG_LEVEL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// How `drop_attribute` decides whether the attribute exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropAttributeSemantics {
    /// Absent attribute is `AttributeNotFound`; present attribute is dropped
    #[default]
    Corrected,
    /// Present attribute is `AttributeNotFound`; absent attribute "succeeds"
    /// after clearing the table's rows
    Legacy,
}

/// What a manager operation does when the store cannot clear a range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreFailurePolicy {
    /// Report `StoreUnavailable` and leave the catalog unmodified
    #[default]
    Propagate,
    /// Log the failure and update the catalog anyway
    LogAndContinue,
}

impl FromStr for DropAttributeSemantics {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "corrected" => Ok(Self::Corrected),
            "legacy" => Ok(Self::Legacy),
            _ => Err(ConfigError::InvalidValue {
                key: ENV_DROP_ATTRIBUTE.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for StoreFailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "propagate" => Ok(Self::Propagate),
            "log_and_continue" | "log" => Ok(Self::LogAndContinue),
            _ => Err(ConfigError::InvalidValue {
                key: ENV_STORE_FAILURE_POLICY.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON structured logs
    Json,
    /// Pretty-printed logs
    #[default]
    Pretty,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

/// Table manager configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KvCatalogConfig {
    /// Reject blank or duplicate attribute names and undeclared primary keys
    /// at table creation, and refuse to drop primary key attributes
    pub strict_schema: bool,
    pub drop_attribute_semantics: DropAttributeSemantics,
    pub store_failure_policy: StoreFailurePolicy,
    /// Where `TableManager::checkpoint` writes by default
    pub snapshot_path: Option<PathBuf>,
    pub log: LogConfig,
}

impl Default for KvCatalogConfig {
    fn default() -> Self {
        Self {
            strict_schema: true,
            drop_attribute_semantics: DropAttributeSemantics::Corrected,
            store_failure_policy: StoreFailurePolicy::Propagate,
            snapshot_path: None,
            log: LogConfig::default(),
        }
    }
}

impl KvCatalogConfig {
    /// Behaviour of the reference implementation: permissive schema checks,
    /// inverted attribute drop, swallowed store errors
    pub fn legacy() -> Self {
        Self {
            strict_schema: false,
            drop_attribute_semantics: DropAttributeSemantics::Legacy,
            store_failure_policy: StoreFailurePolicy::LogAndContinue,
            ..Self::default()
        }
    }

    /// Read a JSON config file; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Read `path` if it exists, otherwise start from defaults, then apply
    /// environment overrides
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup; unset keys are skipped
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        if let Some(value) = lookup(ENV_STRICT_SCHEMA) {
            self.strict_schema = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_STRICT_SCHEMA.to_string(),
                        value,
                    });
                }
            };
        }

        if let Some(value) = lookup(ENV_DROP_ATTRIBUTE) {
            self.drop_attribute_semantics = value.parse()?;
        }

        if let Some(value) = lookup(ENV_STORE_FAILURE_POLICY) {
            self.store_failure_policy = value.parse()?;
        }

        if let Some(value) = lookup(ENV_SNAPSHOT_PATH) {
            self.snapshot_path = if value.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(value))
            };
        }

        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            self.log.level = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_LOG_LEVEL.to_string(),
                value: value.clone(),
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = KvCatalogConfig::default();
        assert!(config.strict_schema);
        assert_eq!(
            config.drop_attribute_semantics,
            DropAttributeSemantics::Corrected
        );
        assert_eq!(config.store_failure_policy, StoreFailurePolicy::Propagate);
        assert_eq!(config.log.level, LogLevel::Info);
        assert_eq!(config.log.format, LogFormat::Pretty);
    }

    #[test]
    fn test_config_from_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("kvcatalog.json");
        fs::write(
            &path,
            r#"{ "store_failure_policy": "log_and_continue", "log": { "level": "debug" } }"#,
        )
        .unwrap();

        let config = KvCatalogConfig::from_file(&path).unwrap();
        assert_eq!(
            config.store_failure_policy,
            StoreFailurePolicy::LogAndContinue
        );
        assert_eq!(config.log.level, LogLevel::Debug);
        assert!(config.strict_schema);
    }

    #[test]
    fn test_config_file_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("kvcatalog.json");
        let mut config = KvCatalogConfig::legacy();
        config.snapshot_path = Some(temp_dir.path().join("catalog.json"));
        fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        assert_eq!(KvCatalogConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_config_load_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = KvCatalogConfig::load(temp_dir.path().join("absent.json")).unwrap();
        assert!(config.strict_schema);
    }

    #[test]
    fn test_config_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("kvcatalog.json");
        fs::write(&path, "{ strict_schema: }").unwrap();
        assert!(matches!(
            KvCatalogConfig::from_file(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_config_overrides() {
        let mut config = KvCatalogConfig::default();
        config
            .apply_overrides(lookup_from(&[
                (ENV_STRICT_SCHEMA, "off"),
                (ENV_DROP_ATTRIBUTE, "LEGACY"),
                (ENV_STORE_FAILURE_POLICY, "log"),
                (ENV_SNAPSHOT_PATH, "/var/lib/kvcatalog/catalog.json"),
                (ENV_LOG_LEVEL, "warn"),
            ]))
            .unwrap();

        assert!(!config.strict_schema);
        assert_eq!(config.drop_attribute_semantics, DropAttributeSemantics::Legacy);
        assert_eq!(
            config.store_failure_policy,
            StoreFailurePolicy::LogAndContinue
        );
        assert_eq!(
            config.snapshot_path,
            Some(PathBuf::from("/var/lib/kvcatalog/catalog.json"))
        );
        assert_eq!(config.log.level, LogLevel::Warn);
    }

    #[test]
    fn test_config_invalid_override() {
        let mut config = KvCatalogConfig::default();
        let result = config.apply_overrides(lookup_from(&[(ENV_DROP_ATTRIBUTE, "sideways")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));

        let result = config.apply_overrides(lookup_from(&[(ENV_STRICT_SCHEMA, "maybe")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
