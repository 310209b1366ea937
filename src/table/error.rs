//! Table metadata error definitions

use thiserror::Error;

/// Table metadata error types
///
/// Raised while building a table schema or mutating its attribute map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// No primary key, or a blank primary key name
    #[error("table requires a non-empty primary key")]
    NoPrimaryKey,
    /// Attribute names and types were not paired one to one
    #[error("attribute count mismatch: {names} names, {types} types")]
    AttributeCountMismatch { names: usize, types: usize },
    /// Attribute name is empty or whitespace
    #[error("attribute name cannot be blank")]
    BlankAttributeName,
    /// Attribute declared twice
    #[error("duplicate attribute: {0}")]
    DuplicateAttribute(String),
    /// Primary key refers to an attribute that is not declared
    #[error("primary key attribute not declared: {0}")]
    PrimaryKeyNotDeclared(String),
    /// Attribute already present on the table
    #[error("attribute already exists: {0}")]
    AttributeAlreadyExists(String),
    /// Attribute not present on the table
    #[error("attribute not found: {0}")]
    AttributeNotFound(String),
    /// Attribute is part of the primary key and cannot be dropped
    #[error("attribute is part of the primary key: {0}")]
    PrimaryKeyAttribute(String),
}

/// Result type for table metadata operations
pub type TableResult<T> = Result<T, TableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_error_display() {
        let err = TableError::AttributeCountMismatch { names: 2, types: 1 };
        assert_eq!(err.to_string(), "attribute count mismatch: 2 names, 1 types");

        let err = TableError::DuplicateAttribute("id".to_string());
        assert_eq!(err.to_string(), "duplicate attribute: id");
    }
}
