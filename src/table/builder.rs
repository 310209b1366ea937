//! TableMetadataBuilder for fluent schema construction
//!
//! Provides a builder pattern for creating table metadata with:
//! - Attribute definition, singly or as parallel name/type lists
//! - Primary key designation
//! - Validation before build

use crate::table::TableMetadata;
use crate::table::error::{TableError, TableResult};
use crate::types::AttributeType;
use linked_hash_map::LinkedHashMap;
use std::collections::HashSet;

/// Builder for constructing TableMetadata instances
///
/// # Example
/// ```
/// use kvcatalog::table::TableMetadataBuilder;
/// use kvcatalog::types::AttributeType;
///
/// let meta = TableMetadataBuilder::new()
///     .attribute("id", AttributeType::Int)
///     .attribute("name", AttributeType::Varchar)
///     .primary_key("id")
///     .try_build()
///     .unwrap();
/// assert_eq!(meta.attribute_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct TableMetadataBuilder {
    attribute_names: Vec<String>,
    attribute_types: Vec<AttributeType>,
    primary_keys: Vec<String>,
    strict: bool,
}

impl TableMetadataBuilder {
    /// Create a new builder in strict mode
    pub fn new() -> Self {
        Self {
            attribute_names: Vec::new(),
            attribute_types: Vec::new(),
            primary_keys: Vec::new(),
            strict: true,
        }
    }

    /// Add a single attribute
    pub fn attribute(mut self, name: impl Into<String>, attribute_type: AttributeType) -> Self {
        self.attribute_names.push(name.into());
        self.attribute_types.push(attribute_type);
        self
    }

    /// Add attributes from parallel name and type lists
    ///
    /// The lists are paired by index in `try_build`; a length mismatch is
    /// reported there, after the primary key check.
    pub fn attributes<S: AsRef<str>>(mut self, names: &[S], types: &[AttributeType]) -> Self {
        self.attribute_names
            .extend(names.iter().map(|n| n.as_ref().to_string()));
        self.attribute_types.extend_from_slice(types);
        self
    }

    /// Add a primary key attribute
    pub fn primary_key(mut self, name: impl Into<String>) -> Self {
        self.primary_keys.push(name.into());
        self
    }

    /// Add multiple primary key attributes
    pub fn primary_keys<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.primary_keys
            .extend(names.iter().map(|n| n.as_ref().to_string()));
        self
    }

    /// Toggle schema checks beyond the primary key and count rules
    ///
    /// Strict mode rejects blank or duplicate attribute names and primary
    /// keys that are not declared attributes.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Build with validation
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// primary key presence, name/type pairing, then the strict checks.
    pub fn try_build(self) -> TableResult<TableMetadata> {
        if self.primary_keys.is_empty() || self.primary_keys.iter().any(|pk| pk.trim().is_empty())
        {
            return Err(TableError::NoPrimaryKey);
        }

        if self.attribute_names.len() != self.attribute_types.len() {
            return Err(TableError::AttributeCountMismatch {
                names: self.attribute_names.len(),
                types: self.attribute_types.len(),
            });
        }

        if self.strict {
            let mut seen = HashSet::new();
            for name in &self.attribute_names {
                if name.trim().is_empty() {
                    return Err(TableError::BlankAttributeName);
                }
                if !seen.insert(name.as_str()) {
                    return Err(TableError::DuplicateAttribute(name.clone()));
                }
            }
            if let Some(pk) = self
                .primary_keys
                .iter()
                .find(|pk| !seen.contains(pk.as_str()))
            {
                return Err(TableError::PrimaryKeyNotDeclared(pk.clone()));
            }
        }

        let mut attributes = LinkedHashMap::with_capacity(self.attribute_names.len());
        for (name, attribute_type) in self.attribute_names.into_iter().zip(self.attribute_types) {
            attributes.insert(name, attribute_type);
        }

        Ok(TableMetadata::from_parts(attributes, self.primary_keys))
    }
}

impl Default for TableMetadataBuilder {
    fn default() -> Self {
        Self::new()
    }
}
