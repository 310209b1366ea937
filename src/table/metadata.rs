//! Table metadata structure

use crate::table::error::{TableError, TableResult};
use crate::types::AttributeType;
use linked_hash_map::LinkedHashMap;
use serde::{Deserialize, Serialize};

/// Table metadata structure
///
/// Stores the schema of one table:
/// - attributes: attribute name to type, in declaration order
/// - primary_keys: names of the attributes forming the primary key
///
/// The primary key list is checked for emptiness when the metadata is built
/// through [`TableMetadataBuilder`](crate::table::TableMetadataBuilder), and
/// again by [`TableMetadata::validate`] when it is read back from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Attribute definitions
    attributes: LinkedHashMap<String, AttributeType>,
    /// Primary key attribute names
    primary_keys: Vec<String>,
}

impl TableMetadata {
    pub(crate) fn from_parts(
        attributes: LinkedHashMap<String, AttributeType>,
        primary_keys: Vec<String>,
    ) -> Self {
        Self {
            attributes,
            primary_keys,
        }
    }

    /// Get all attributes
    pub fn attributes(&self) -> &LinkedHashMap<String, AttributeType> {
        &self.attributes
    }

    /// Get attribute names in declaration order
    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.keys().map(String::as_str).collect()
    }

    /// Get the type of an attribute
    pub fn attribute_type(&self, name: &str) -> Option<AttributeType> {
        self.attributes.get(name).copied()
    }

    /// Check if an attribute is declared
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Get attribute count
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Get primary key attribute names
    pub fn primary_keys(&self) -> &[String] {
        &self.primary_keys
    }

    /// Check if an attribute is part of the primary key
    pub fn is_primary_key(&self, name: &str) -> bool {
        self.primary_keys.iter().any(|pk| pk == name)
    }

    /// Add an attribute at the end of the schema
    pub fn add_attribute(&mut self, name: &str, attribute_type: AttributeType) -> TableResult<()> {
        if self.attributes.contains_key(name) {
            return Err(TableError::AttributeAlreadyExists(name.to_string()));
        }
        self.attributes.insert(name.to_string(), attribute_type);
        Ok(())
    }

    /// Check the invariants a built table holds
    ///
    /// The primary key must be non-empty with no blank names. In strict mode
    /// attribute names must be non-blank and every primary key must be a
    /// declared attribute.
    pub fn validate(&self, strict: bool) -> TableResult<()> {
        if self.primary_keys.is_empty() || self.primary_keys.iter().any(|pk| pk.trim().is_empty())
        {
            return Err(TableError::NoPrimaryKey);
        }

        if strict {
            if self.attributes.keys().any(|name| name.trim().is_empty()) {
                return Err(TableError::BlankAttributeName);
            }
            if let Some(pk) = self
                .primary_keys
                .iter()
                .find(|pk| !self.attributes.contains_key(pk.as_str()))
            {
                return Err(TableError::PrimaryKeyNotDeclared(pk.clone()));
            }
        }
        Ok(())
    }

    /// Check that an attribute is declared and may be dropped
    ///
    /// With `protect_primary_key` set, primary key members are refused.
    pub fn check_droppable(&self, name: &str, protect_primary_key: bool) -> TableResult<()> {
        if !self.attributes.contains_key(name) {
            return Err(TableError::AttributeNotFound(name.to_string()));
        }
        if protect_primary_key && self.is_primary_key(name) {
            return Err(TableError::PrimaryKeyAttribute(name.to_string()));
        }
        Ok(())
    }

    /// Remove an attribute, returning its type if it was declared
    pub fn remove_attribute(&mut self, name: &str) -> Option<AttributeType> {
        self.attributes.remove(name)
    }
}
