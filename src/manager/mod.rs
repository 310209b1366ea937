//! Table manager
//!
//! Public entry point for schema changes. Each operation validates its input
//! against the catalog, clears key ranges through the store gateway where the
//! change destroys data, and then mutates the catalog. The catalog write lock
//! is held for the whole sequence, so operations on one manager are
//! serialised.
//!
//! The store clear and the catalog update are separate steps. Under
//! [`StoreFailurePolicy::Propagate`] the store goes first and a failed clear
//! leaves the catalog untouched; a crash between a successful clear and the
//! catalog update still leaves the two out of step.

use crate::catalog::{Catalog, CatalogResult};
use crate::config::{DropAttributeSemantics, KvCatalogConfig, StoreFailurePolicy};
use crate::store::{KvStore, StoreError, StoreGateway};
use crate::table::{TableError, TableMetadata, TableMetadataBuilder};
use crate::types::AttributeType;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub mod error;

pub use error::{ManagerError, ManagerResult};

/// Table manager owning one catalog and the gateway to its store
///
/// `Send + Sync`; share it behind an `Arc`. Behaviour on store failures and
/// on attribute drops follows [`KvCatalogConfig`].
pub struct TableManager {
    catalog: RwLock<Catalog>,
    gateway: StoreGateway,
    config: KvCatalogConfig,
}

impl TableManager {
    /// Create a manager with an empty catalog and the default configuration
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self::with_config(KvCatalogConfig::default(), store)
    }

    pub fn with_config(config: KvCatalogConfig, store: Arc<dyn KvStore>) -> Self {
        Self::with_catalog(config, store, Catalog::new())
    }

    pub fn with_catalog(config: KvCatalogConfig, store: Arc<dyn KvStore>, catalog: Catalog) -> Self {
        Self {
            catalog: RwLock::new(catalog),
            gateway: StoreGateway::new(store),
            config,
        }
    }

    /// Create a manager, loading the catalog from `config.snapshot_path`
    /// when that file exists
    pub fn open(config: KvCatalogConfig, store: Arc<dyn KvStore>) -> CatalogResult<Self> {
        let catalog = match &config.snapshot_path {
            Some(path) if path.exists() => Catalog::load_snapshot(path, config.strict_schema)?,
            _ => Catalog::new(),
        };
        info!(tables = catalog.len(), "table manager opened");
        Ok(Self::with_catalog(config, store, catalog))
    }

    /// Create a manager from a snapshot written by [`TableManager::checkpoint_to`]
    pub fn restore(
        config: KvCatalogConfig,
        store: Arc<dyn KvStore>,
        path: impl AsRef<Path>,
    ) -> CatalogResult<Self> {
        let catalog = Catalog::load_snapshot(path, config.strict_schema)?;
        info!(tables = catalog.len(), "table manager restored");
        Ok(Self::with_catalog(config, store, catalog))
    }

    pub fn config(&self) -> &KvCatalogConfig {
        &self.config
    }

    pub fn gateway(&self) -> &StoreGateway {
        &self.gateway
    }

    /// Register a table
    ///
    /// `attribute_names` and `attribute_types` are paired by index. Checks run
    /// in order and stop at the first failure, leaving the catalog unchanged:
    /// the name is free, the primary key is non-empty with no blank names,
    /// the two lists have equal length, and (in strict mode) the attribute
    /// names are unique and non-blank and cover the primary key.
    pub fn create_table<S, P>(
        &self,
        table_name: &str,
        attribute_names: &[S],
        attribute_types: &[AttributeType],
        primary_keys: &[P],
    ) -> ManagerResult<()>
    where
        S: AsRef<str>,
        P: AsRef<str>,
    {
        let mut catalog = self.catalog.write();
        if catalog.contains(table_name) {
            return Err(ManagerError::TableAlreadyExists(table_name.to_string()));
        }

        let metadata = TableMetadataBuilder::new()
            .attributes(attribute_names, attribute_types)
            .primary_keys(primary_keys)
            .strict(self.config.strict_schema)
            .try_build()
            .map_err(|e| ManagerError::from_table_error(table_name, e))?;

        let attribute_count = metadata.attribute_count();
        catalog
            .insert(table_name, metadata)
            .map_err(|_| ManagerError::TableAlreadyExists(table_name.to_string()))?;

        info!(
            table = table_name,
            attributes = attribute_count,
            "table created"
        );
        Ok(())
    }

    /// Delete a table and every row stored under its key range
    pub fn delete_table(&self, table_name: &str) -> ManagerResult<()> {
        let mut catalog = self.catalog.write();
        if !catalog.contains(table_name) {
            return Err(ManagerError::TableNotFound(table_name.to_string()));
        }

        self.clear_table_rows(table_name)
            .map_err(|source| ManagerError::StoreUnavailable {
                table: table_name.to_string(),
                source,
            })?;

        catalog
            .remove(table_name)
            .map_err(|_| ManagerError::TableNotFound(table_name.to_string()))?;

        info!(table = table_name, "table deleted");
        Ok(())
    }

    /// Snapshot of every table's metadata, keyed by table name
    pub fn list_tables(&self) -> HashMap<String, TableMetadata> {
        self.catalog.read().list()
    }

    /// Table names, sorted
    pub fn table_names(&self) -> Vec<String> {
        self.catalog.read().table_names()
    }

    pub fn describe_table(&self, table_name: &str) -> ManagerResult<TableMetadata> {
        self.catalog
            .read()
            .lookup(table_name)
            .cloned()
            .ok_or_else(|| ManagerError::TableNotFound(table_name.to_string()))
    }

    pub fn table_exists(&self, table_name: &str) -> bool {
        self.catalog.read().contains(table_name)
    }

    pub fn table_count(&self) -> usize {
        self.catalog.read().len()
    }

    /// Add an attribute to a table's schema
    ///
    /// Schema only; stored rows are not touched.
    pub fn add_attribute(
        &self,
        table_name: &str,
        attribute_name: &str,
        attribute_type: AttributeType,
    ) -> ManagerResult<()> {
        let mut catalog = self.catalog.write();
        let metadata = catalog
            .get_mut(table_name)
            .map_err(|_| ManagerError::TableNotFound(table_name.to_string()))?;

        check_attribute_name(table_name, attribute_name)?;

        metadata
            .add_attribute(attribute_name, attribute_type)
            .map_err(|e| ManagerError::from_table_error(table_name, e))?;

        debug!(
            table = table_name,
            attribute = attribute_name,
            attribute_type = %attribute_type,
            "attribute added"
        );
        Ok(())
    }

    /// Drop an attribute from a table's schema
    ///
    /// Dropping clears the table's whole key range before the attribute is
    /// removed. Which attributes count as droppable depends on
    /// [`DropAttributeSemantics`].
    pub fn drop_attribute(&self, table_name: &str, attribute_name: &str) -> ManagerResult<()> {
        let mut catalog = self.catalog.write();
        let metadata = catalog
            .get_mut(table_name)
            .map_err(|_| ManagerError::TableNotFound(table_name.to_string()))?;

        check_attribute_name(table_name, attribute_name)?;

        match self.config.drop_attribute_semantics {
            DropAttributeSemantics::Corrected => metadata
                .check_droppable(attribute_name, self.config.strict_schema)
                .map_err(|e| ManagerError::from_table_error(table_name, e))?,
            DropAttributeSemantics::Legacy => {
                if metadata.has_attribute(attribute_name) {
                    return Err(ManagerError::AttributeNotFound {
                        table: table_name.to_string(),
                        attribute: attribute_name.to_string(),
                    });
                }
            }
        }

        self.clear_table_rows(table_name)
            .map_err(|source| ManagerError::StoreUnavailable {
                table: table_name.to_string(),
                source,
            })?;
        metadata.remove_attribute(attribute_name);

        debug!(
            table = table_name,
            attribute = attribute_name,
            "attribute dropped"
        );
        Ok(())
    }

    /// Delete every table
    ///
    /// Each table goes through the same clear-then-remove path as
    /// [`TableManager::delete_table`]. Under `Propagate`, tables whose clear
    /// failed stay registered and are named in [`ManagerError::PartialDrop`].
    pub fn drop_all_tables(&self) -> ManagerResult<()> {
        let mut catalog = self.catalog.write();
        let mut failed = Vec::new();

        for table_name in catalog.table_names() {
            match self.clear_table_rows(&table_name) {
                Ok(()) => {
                    let _ = catalog.remove(&table_name);
                }
                Err(_) => failed.push(table_name),
            }
        }

        if !failed.is_empty() {
            warn!(kept = failed.len(), "drop all tables left tables registered");
            return Err(ManagerError::PartialDrop { failed });
        }

        catalog.clear();
        info!("all tables dropped");
        Ok(())
    }

    /// Write the catalog to the configured snapshot path
    ///
    /// Returns the path written, or `None` when no snapshot path is set.
    pub fn checkpoint(&self) -> CatalogResult<Option<PathBuf>> {
        match &self.config.snapshot_path {
            Some(path) => {
                self.checkpoint_to(path)?;
                Ok(Some(path.clone()))
            }
            None => Ok(None),
        }
    }

    pub fn checkpoint_to(&self, path: impl AsRef<Path>) -> CatalogResult<()> {
        self.catalog.read().save_snapshot(path)
    }

    /// Clear a table's key range, applying the store failure policy
    ///
    /// Returns an error only under `Propagate`.
    fn clear_table_rows(&self, table_name: &str) -> Result<(), StoreError> {
        match self.gateway.clear_range(table_name) {
            Ok(()) => Ok(()),
            Err(err) => match self.config.store_failure_policy {
                StoreFailurePolicy::Propagate => {
                    warn!(table = table_name, error = %err, "range clear failed");
                    Err(err)
                }
                StoreFailurePolicy::LogAndContinue => {
                    warn!(
                        table = table_name,
                        error = %err,
                        "range clear failed, continuing with catalog update"
                    );
                    Ok(())
                }
            },
        }
    }
}

/// Reject blank attribute names
fn check_attribute_name(table_name: &str, attribute_name: &str) -> ManagerResult<()> {
    if attribute_name.trim().is_empty() {
        return Err(ManagerError::from_table_error(
            table_name,
            TableError::BlankAttributeName,
        ));
    }
    Ok(())
}
