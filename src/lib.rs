//! kvcatalog table metadata manager library
//!
//! Keeps the schema catalog of tables stored in an ordered transactional
//! key-value store and clears a table's key range when the table, or one of
//! its attributes, is dropped.

// Global type definitions
pub mod types;

pub mod catalog;
pub mod config;
pub mod logging;
pub mod manager;
pub mod store;
pub mod table;

// Re-export the manager surface for easier access
pub use config::KvCatalogConfig;
pub use manager::{ManagerError, ManagerResult, TableManager};
pub use types::{AttributeType, StatusCode};
