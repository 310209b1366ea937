//! In-memory ordered key-value store
//!
//! Keys live in a `BTreeMap` behind a `parking_lot::RwLock`. Transactions
//! buffer their writes and apply them under the write lock on commit, so a
//! commit is all or nothing. Availability and commit failures can be
//! injected to exercise error paths.

use crate::store::error::{StoreError, StoreResult};
use crate::store::interface::{KeyRange, KvStore, Transaction, TransactionId};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use tracing::debug;

#[derive(Debug)]
struct MemInner {
    data: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
    available: AtomicBool,
    failing_commits: AtomicUsize,
    next_txn_id: AtomicU64,
    committed: AtomicU64,
}

/// In-memory store handle
///
/// Clones share the same underlying data.
#[derive(Debug, Clone)]
pub struct MemKvStore {
    inner: Arc<MemInner>,
}

impl MemKvStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MemInner {
                data: RwLock::new(BTreeMap::new()),
                available: AtomicBool::new(true),
                failing_commits: AtomicUsize::new(0),
                next_txn_id: AtomicU64::new(1),
                committed: AtomicU64::new(0),
            }),
        }
    }

    /// Make `begin` and `commit` fail while `available` is false
    pub fn set_available(&self, available: bool) {
        self.inner.available.store(available, Ordering::SeqCst);
    }

    /// Reject the next `count` commits
    pub fn fail_next_commits(&self, count: usize) {
        self.inner.failing_commits.store(count, Ordering::SeqCst);
    }

    /// Number of committed transactions
    pub fn committed_transactions(&self) -> u64 {
        self.inner.committed.load(Ordering::SeqCst)
    }

    /// Number of keys stored
    pub fn len(&self) -> usize {
        self.inner.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.data.read().is_empty()
    }

    /// Number of keys stored inside a range
    pub fn count_range(&self, range: &KeyRange) -> usize {
        if range.is_empty() {
            return 0;
        }
        self.inner
            .data
            .read()
            .range::<[u8], _>((
                Bound::Included(range.begin.as_slice()),
                Bound::Excluded(range.end.as_slice()),
            ))
            .count()
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.inner.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("in-memory store is offline".to_string()))
        }
    }

    /// Consume one injected commit failure, if any
    fn take_commit_failure(&self) -> bool {
        self.inner
            .failing_commits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl Default for MemKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for MemKvStore {
    fn begin(&self) -> StoreResult<Box<dyn Transaction>> {
        self.check_available()?;
        let id = self.inner.next_txn_id.fetch_add(1, Ordering::SeqCst);
        debug!(txn_id = id, "transaction started");
        Ok(Box::new(MemTransaction {
            store: self.clone(),
            id,
            mutations: Vec::new(),
        }))
    }
}

#[derive(Debug, Clone)]
enum Mutation {
    Set(Vec<u8>, Vec<u8>),
    Clear(Vec<u8>),
    ClearRange(KeyRange),
}

impl Mutation {
    fn apply(self, data: &mut BTreeMap<Vec<u8>, Vec<u8>>) {
        match self {
            Mutation::Set(key, value) => {
                data.insert(key, value);
            }
            Mutation::Clear(key) => {
                data.remove(&key);
            }
            Mutation::ClearRange(range) => {
                if !range.is_empty() {
                    data.retain(|key, _| !range.contains(key));
                }
            }
        }
    }
}

/// Transaction over a [`MemKvStore`]
pub struct MemTransaction {
    store: MemKvStore,
    id: TransactionId,
    mutations: Vec<Mutation>,
}

impl MemTransaction {
    /// Committed view of a range with this transaction's writes laid over it
    fn overlay(&self, range: &KeyRange) -> BTreeMap<Vec<u8>, Vec<u8>> {
        let mut view: BTreeMap<Vec<u8>, Vec<u8>> = if range.is_empty() {
            BTreeMap::new()
        } else {
            self.store
                .inner
                .data
                .read()
                .range::<[u8], _>((
                    Bound::Included(range.begin.as_slice()),
                    Bound::Excluded(range.end.as_slice()),
                ))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        };

        for mutation in &self.mutations {
            match mutation {
                Mutation::Set(key, _) if !range.contains(key) => {}
                other => other.clone().apply(&mut view),
            }
        }
        view
    }
}

impl Transaction for MemTransaction {
    fn id(&self) -> TransactionId {
        self.id
    }

    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        for mutation in self.mutations.iter().rev() {
            match mutation {
                Mutation::Set(k, v) if k.as_slice() == key => return Ok(Some(v.clone())),
                Mutation::Clear(k) if k.as_slice() == key => return Ok(None),
                Mutation::ClearRange(range) if range.contains(key) => return Ok(None),
                _ => {}
            }
        }
        Ok(self.store.inner.data.read().get(key).cloned())
    }

    fn get_range(&self, range: &KeyRange) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>> {
        Ok(self.overlay(range).into_iter().collect())
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.mutations
            .push(Mutation::Set(key.to_vec(), value.to_vec()));
        Ok(())
    }

    fn clear(&mut self, key: &[u8]) -> StoreResult<()> {
        self.mutations.push(Mutation::Clear(key.to_vec()));
        Ok(())
    }

    fn clear_range(&mut self, range: &KeyRange) -> StoreResult<()> {
        self.mutations.push(Mutation::ClearRange(range.clone()));
        Ok(())
    }

    fn commit(mut self: Box<Self>) -> StoreResult<()> {
        self.store.check_available()?;
        if self.store.take_commit_failure() {
            return Err(StoreError::CommitFailed(format!(
                "transaction {} rejected",
                self.id
            )));
        }

        let mutations = std::mem::take(&mut self.mutations);
        let count = mutations.len();
        {
            let mut data = self.store.inner.data.write();
            for mutation in mutations {
                mutation.apply(&mut data);
            }
        }
        self.store.inner.committed.fetch_add(1, Ordering::SeqCst);

        debug!(txn_id = self.id, mutations = count, "transaction committed");
        Ok(())
    }

    fn rollback(mut self: Box<Self>) {
        self.mutations.clear();
        debug!(txn_id = self.id, "transaction rolled back");
    }
}
