//! Catalog error definitions

use thiserror::Error;

/// Catalog error types
///
/// Represents all possible errors that can occur during catalog operations
/// such as table registration, lookup, and snapshot persistence.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Table already exists
    #[error("Table already exists: {0}")]
    TableAlreadyExists(String),
    /// Table not found
    #[error("Table not found: {0}")]
    TableNotFound(String),
    /// I/O error during snapshot read or write
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Snapshot could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Snapshot checksum did not match its content
    #[error("Corrupted snapshot: {0}")]
    Corrupted(String),
    /// Snapshot holds a table that breaks the schema invariants
    #[error("Invalid table {table} in snapshot: {reason}")]
    InvalidTable { table: String, reason: String },
    /// Snapshot written by an unknown format version
    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
