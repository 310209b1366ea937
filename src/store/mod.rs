//! Store module
//!
//! This module is the only coupling to the ordered transactional key-value
//! store. It provides the store traits, the tuple key encoding used to derive
//! a table's key range, an in-memory store, and the gateway the table
//! manager uses to clear ranges.

// Re-export error types and result type
pub mod error;
pub use error::{StoreError, StoreResult};

// Re-export interface traits
pub mod interface;
pub use interface::{KeyRange, KvStore, Transaction, TransactionId};

pub mod gateway;
pub use gateway::StoreGateway;

pub mod memory;
pub use memory::MemKvStore;

pub mod tuple;

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
