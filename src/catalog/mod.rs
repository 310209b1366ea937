//! Table catalog
//!
//! In-memory registry from table name to [`TableMetadata`]. Names are unique
//! and case-sensitive. The catalog does no locking of its own; the owner
//! serialises access.

use crate::table::TableMetadata;
use std::collections::HashMap;

pub mod error;
pub mod snapshot;

pub use error::{CatalogError, CatalogResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    tables: HashMap<String, TableMetadata>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tables: HashMap::with_capacity(capacity),
        }
    }

    pub fn lookup(&self, table_name: &str) -> Option<&TableMetadata> {
        self.tables.get(table_name)
    }

    pub fn get(&self, table_name: &str) -> CatalogResult<&TableMetadata> {
        self.tables
            .get(table_name)
            .ok_or_else(|| CatalogError::TableNotFound(table_name.to_string()))
    }

    pub fn get_mut(&mut self, table_name: &str) -> CatalogResult<&mut TableMetadata> {
        self.tables
            .get_mut(table_name)
            .ok_or_else(|| CatalogError::TableNotFound(table_name.to_string()))
    }

    pub fn insert(&mut self, table_name: &str, metadata: TableMetadata) -> CatalogResult<()> {
        if self.tables.contains_key(table_name) {
            return Err(CatalogError::TableAlreadyExists(table_name.to_string()));
        }
        self.tables.insert(table_name.to_string(), metadata);
        Ok(())
    }

    pub fn remove(&mut self, table_name: &str) -> CatalogResult<TableMetadata> {
        self.tables
            .remove(table_name)
            .ok_or_else(|| CatalogError::TableNotFound(table_name.to_string()))
    }

    pub fn contains(&self, table_name: &str) -> bool {
        self.tables.contains_key(table_name)
    }

    /// Snapshot of every table. Iteration order is unspecified.
    pub fn list(&self) -> HashMap<String, TableMetadata> {
        self.tables.clone()
    }

    /// Table names, sorted
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn clear(&mut self) {
        self.tables.clear();
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &TableMetadata)> {
        self.tables.iter()
    }
}
