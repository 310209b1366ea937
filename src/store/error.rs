//! Store error definitions

use thiserror::Error;

/// Store error types
///
/// Failures reported by the key-value store while opening or committing a
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Store could not be reached or refused a new transaction
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    /// Commit was rejected; none of the transaction's writes were applied
    #[error("Commit failed: {0}")]
    CommitFailed(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
