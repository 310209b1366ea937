//! Store gateway used by the table manager
//!
//! Clearing a table's key range is the manager's only interaction with the
//! store. Each clear runs in its own transaction scope: begin, clear, commit.
//! A scope that is dropped without committing rolls its transaction back, so
//! the handle is released on every exit path.

use crate::store::error::{StoreError, StoreResult};
use crate::store::interface::{KeyRange, KvStore, Transaction};
use crate::store::tuple;
use std::sync::Arc;
use tracing::debug;

/// Scoped transaction handle
///
/// Rolls back on drop unless [`TransactionScope::commit`] was called.
pub struct TransactionScope {
    txn: Option<Box<dyn Transaction>>,
}

impl TransactionScope {
    pub fn begin(store: &dyn KvStore) -> StoreResult<Self> {
        Ok(Self {
            txn: Some(store.begin()?),
        })
    }

    pub fn transaction(&mut self) -> StoreResult<&mut (dyn Transaction + 'static)> {
        self.txn.as_deref_mut().ok_or_else(|| {
            StoreError::Unavailable("transaction scope already released".to_string())
        })
    }

    pub fn commit(mut self) -> StoreResult<()> {
        match self.txn.take() {
            Some(txn) => txn.commit(),
            None => Err(StoreError::Unavailable(
                "transaction scope already released".to_string(),
            )),
        }
    }
}

impl Drop for TransactionScope {
    fn drop(&mut self) {
        if let Some(txn) = self.txn.take() {
            debug!(txn_id = txn.id(), "releasing uncommitted transaction");
            txn.rollback();
        }
    }
}

/// Gateway between the table manager and the key-value store
#[derive(Clone)]
pub struct StoreGateway {
    store: Arc<dyn KvStore>,
}

impl StoreGateway {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Key range holding every row of `table_name`
    pub fn table_range(&self, table_name: &str) -> KeyRange {
        tuple::table_range(table_name)
    }

    /// Delete every key of a table in a single committed transaction
    pub fn clear_range(&self, table_name: &str) -> StoreResult<()> {
        let range = self.table_range(table_name);
        let mut scope = TransactionScope::begin(self.store.as_ref())?;
        scope.transaction()?.clear_range(&range)?;
        scope.commit()?;
        debug!(table = table_name, "table key range cleared");
        Ok(())
    }

    /// Run `f` inside a committed transaction scope
    pub fn run<T>(
        &self,
        f: impl FnOnce(&mut dyn Transaction) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut scope = TransactionScope::begin(self.store.as_ref())?;
        let value = f(scope.transaction()?)?;
        scope.commit()?;
        Ok(value)
    }
}
