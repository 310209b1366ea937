//! Table manager error definitions

use crate::store::StoreError;
use crate::table::TableError;
use crate::types::StatusCode;
use thiserror::Error;

/// Table manager error types
///
/// Every variant maps onto one [`StatusCode`] through
/// [`ManagerError::status_code`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManagerError {
    /// Table name already registered
    #[error("Table already exists: {0}")]
    TableAlreadyExists(String),
    /// Table name not registered
    #[error("Table not found: {0}")]
    TableNotFound(String),
    /// Table creation without a usable primary key
    #[error("Table {0} has no primary key")]
    NoPrimaryKey(String),
    /// Attribute declaration rejected
    #[error("Invalid attribute on table {table}: {reason}")]
    AttributeInvalid { table: String, reason: String },
    /// Attribute already declared on the table
    #[error("Attribute {attribute} already exists on table {table}")]
    AttributeAlreadyExists { table: String, attribute: String },
    /// Attribute not declared on the table
    #[error("Attribute {attribute} not found on table {table}")]
    AttributeNotFound { table: String, attribute: String },
    /// Store could not clear the table's key range; the catalog was not changed
    #[error("Store unavailable while clearing table {table}: {source}")]
    StoreUnavailable {
        table: String,
        #[source]
        source: StoreError,
    },
    /// Some tables could not be cleared during drop-all and were kept
    #[error("Store unavailable, tables kept: {}", .failed.join(", "))]
    PartialDrop { failed: Vec<String> },
}

impl ManagerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // the status enumeration has no table-level "already exists" code
            ManagerError::TableAlreadyExists(_) => StatusCode::AttributeAlreadyExists,
            ManagerError::TableNotFound(_) => StatusCode::TableNotFound,
            ManagerError::NoPrimaryKey(_) => StatusCode::TableCreationNoPrimaryKey,
            ManagerError::AttributeInvalid { .. } => StatusCode::TableCreationAttributeInvalid,
            ManagerError::AttributeAlreadyExists { .. } => StatusCode::AttributeAlreadyExists,
            ManagerError::AttributeNotFound { .. } => StatusCode::AttributeNotFound,
            ManagerError::StoreUnavailable { .. } | ManagerError::PartialDrop { .. } => {
                StatusCode::StoreUnavailable
            }
        }
    }

    /// Translate a schema error raised while working on `table`
    pub(crate) fn from_table_error(table: &str, err: TableError) -> Self {
        match err {
            TableError::NoPrimaryKey => ManagerError::NoPrimaryKey(table.to_string()),
            TableError::AttributeAlreadyExists(attribute) => ManagerError::AttributeAlreadyExists {
                table: table.to_string(),
                attribute,
            },
            TableError::AttributeNotFound(attribute) => ManagerError::AttributeNotFound {
                table: table.to_string(),
                attribute,
            },
            other => ManagerError::AttributeInvalid {
                table: table.to_string(),
                reason: other.to_string(),
            },
        }
    }
}

/// Result type for table manager operations
pub type ManagerResult<T> = Result<T, ManagerError>;

impl StatusCode {
    /// Fold an operation result into its status code
    pub fn from_result<T>(result: &ManagerResult<T>) -> Self {
        match result {
            Ok(_) => StatusCode::Success,
            Err(err) => err.status_code(),
        }
    }
}

impl<T> From<&ManagerResult<T>> for StatusCode {
    fn from(result: &ManagerResult<T>) -> Self {
        StatusCode::from_result(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ManagerError::TableAlreadyExists("t".to_string()).status_code(),
            StatusCode::AttributeAlreadyExists
        );
        assert_eq!(
            ManagerError::NoPrimaryKey("t".to_string()).status_code(),
            StatusCode::TableCreationNoPrimaryKey
        );
        assert_eq!(
            ManagerError::PartialDrop {
                failed: vec!["a".to_string()]
            }
            .status_code(),
            StatusCode::StoreUnavailable
        );
    }

    #[test]
    fn test_from_table_error() {
        let err = ManagerError::from_table_error(
            "users",
            TableError::AttributeCountMismatch { names: 2, types: 3 },
        );
        assert_eq!(err.status_code(), StatusCode::TableCreationAttributeInvalid);
        assert_eq!(
            err.to_string(),
            "Invalid attribute on table users: attribute count mismatch: 2 names, 3 types"
        );
    }

    #[test]
    fn test_partial_drop_display() {
        let err = ManagerError::PartialDrop {
            failed: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "Store unavailable, tables kept: a, b");
    }

    #[test]
    fn test_status_from_result() {
        let ok: ManagerResult<()> = Ok(());
        assert_eq!(StatusCode::from_result(&ok), StatusCode::Success);

        let err: ManagerResult<()> = Err(ManagerError::TableNotFound("t".to_string()));
        assert_eq!(StatusCode::from(&err), StatusCode::TableNotFound);
    }
}
