//! Table module for managing table metadata
//!
//! This module implements per-table schema records with the following features:
//! - Attribute name to type mapping, kept in declaration order
//! - Primary key designation
//! - Validating builder used at table creation

pub mod builder;
pub mod error;
pub mod metadata;

pub use builder::TableMetadataBuilder;
pub use error::{TableError, TableResult};
pub use metadata::TableMetadata;
