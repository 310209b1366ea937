//! Global type definitions
//!
//! Scalar attribute types, the status codes of the table manager contract,
//! and the log level shared by configuration and logging.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Attribute type enumeration for table schema
///
/// Represents the declared type of an attribute in a table schema.
/// The set is closed; rows are not encoded by this crate, so no sizes
/// or layouts are attached to the variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AttributeType {
    /// 64-bit signed integer
    Int,
    /// Variable-length string
    Varchar,
    /// 64-bit floating point
    Double,
    /// Boolean
    Boolean,
}

impl AttributeType {
    /// All attribute types, in declaration order.
    pub const ALL: [AttributeType; 4] = [
        AttributeType::Int,
        AttributeType::Varchar,
        AttributeType::Double,
        AttributeType::Boolean,
    ];

    /// Returns the canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::Int => "INT",
            AttributeType::Varchar => "VARCHAR",
            AttributeType::Double => "DOUBLE",
            AttributeType::Boolean => "BOOLEAN",
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a type name does not match any attribute type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown attribute type: {0}")]
pub struct ParseAttributeTypeError(pub String);

impl FromStr for AttributeType {
    type Err = ParseAttributeTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttributeType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseAttributeTypeError(s.to_string()))
    }
}

/// Status codes reported by the table manager
///
/// `StoreUnavailable` is the only code not produced by the legacy contract;
/// it is reported when a range clear fails and the catalog was left as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCode {
    Success,
    AttributeAlreadyExists,
    AttributeNotFound,
    TableNotFound,
    TableCreationNoPrimaryKey,
    TableCreationAttributeInvalid,
    StoreUnavailable,
}

impl StatusCode {
    pub fn is_success(&self) -> bool {
        *self == StatusCode::Success
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCode::Success => "SUCCESS",
            StatusCode::AttributeAlreadyExists => "ATTRIBUTE_ALREADY_EXISTS",
            StatusCode::AttributeNotFound => "ATTRIBUTE_NOT_FOUND",
            StatusCode::TableNotFound => "TABLE_NOT_FOUND",
            StatusCode::TableCreationNoPrimaryKey => "TABLE_CREATION_NO_PRIMARY_KEY",
            StatusCode::TableCreationAttributeInvalid => "TABLE_CREATION_ATTRIBUTE_INVALID",
            StatusCode::StoreUnavailable => "STORE_UNAVAILABLE",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Debug level
    Debug,
    /// Info level
    #[default]
    Info,
    /// Warn level
    Warn,
    /// Error level
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

#[cfg(test)]
mod attribute_type_tests {
    use super::*;

    #[test]
    fn test_attribute_type_display() {
        assert_eq!(AttributeType::Int.to_string(), "INT");
        assert_eq!(AttributeType::Varchar.to_string(), "VARCHAR");
        assert_eq!(AttributeType::Double.to_string(), "DOUBLE");
        assert_eq!(AttributeType::Boolean.to_string(), "BOOLEAN");
    }

    #[test]
    fn test_attribute_type_parse() {
        assert_eq!("int".parse::<AttributeType>().unwrap(), AttributeType::Int);
        assert_eq!(
            " Varchar ".parse::<AttributeType>().unwrap(),
            AttributeType::Varchar
        );
        assert_eq!(
            "BOOLEAN".parse::<AttributeType>().unwrap(),
            AttributeType::Boolean
        );
        assert!("TEXT".parse::<AttributeType>().is_err());
    }

    #[test]
    fn test_attribute_type_serde_names() {
        let json = serde_json::to_string(&AttributeType::Double).unwrap();
        assert_eq!(json, "\"DOUBLE\"");
        let parsed: AttributeType = serde_json::from_str("\"INT\"").unwrap();
        assert_eq!(parsed, AttributeType::Int);
    }

    #[test]
    fn test_status_code_display() {
        assert_eq!(StatusCode::Success.to_string(), "SUCCESS");
        assert_eq!(
            StatusCode::TableCreationNoPrimaryKey.to_string(),
            "TABLE_CREATION_NO_PRIMARY_KEY"
        );
        assert!(StatusCode::Success.is_success());
        assert!(!StatusCode::TableNotFound.is_success());
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::Debug.as_filter_str(), "debug");
        assert!("loud".parse::<LogLevel>().is_err());
    }
}
