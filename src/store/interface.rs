//! Store interface definitions

use crate::store::error::StoreResult;

/// Transaction ID type
pub type TransactionId = u64;

/// Half-open key range `[begin, end)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRange {
    pub begin: Vec<u8>,
    pub end: Vec<u8>,
}

impl KeyRange {
    pub fn new(begin: Vec<u8>, end: Vec<u8>) -> Self {
        Self { begin, end }
    }

    /// Check if a key falls inside the range
    pub fn contains(&self, key: &[u8]) -> bool {
        key >= self.begin.as_slice() && key < self.end.as_slice()
    }

    /// Check if the range can hold no key
    pub fn is_empty(&self) -> bool {
        self.begin >= self.end
    }
}

/// Transaction trait for store operations
/// Writes are buffered in the transaction and become visible to other
/// transactions only when `commit` succeeds.
pub trait Transaction: Send {
    /// Transaction identifier
    fn id(&self) -> TransactionId;

    /// Read a key, observing this transaction's own buffered writes
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// Read every key in a range, in key order
    fn get_range(&self, range: &KeyRange) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>>;

    /// Write a key
    fn set(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()>;

    /// Delete a key
    fn clear(&mut self, key: &[u8]) -> StoreResult<()>;

    /// Delete every key in a range
    fn clear_range(&mut self, range: &KeyRange) -> StoreResult<()>;

    /// Apply all buffered writes atomically
    fn commit(self: Box<Self>) -> StoreResult<()>;

    /// Discard all buffered writes
    fn rollback(self: Box<Self>);
}

/// Store trait
/// This trait defines the entry point of all store implementations
pub trait KvStore: Send + Sync {
    /// Begin a new transaction
    ///
    /// # Returns
    /// * `Ok(Box<dyn Transaction>)` if the store accepted the transaction
    /// * `Err(StoreError)` if the store is unavailable
    fn begin(&self) -> StoreResult<Box<dyn Transaction>>;
}
