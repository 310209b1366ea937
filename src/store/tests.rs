// Store functionality tests

use super::*;
use std::sync::Arc;

fn seed(store: &MemKvStore, table: &str, rows: usize) {
    let gateway = StoreGateway::new(Arc::new(store.clone()));
    gateway
        .run(|txn| {
            for i in 0..rows {
                let key = tuple::pack(&[table.to_string(), i.to_string()]);
                txn.set(&key, format!("row-{}", i).as_bytes())?;
            }
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_transaction_commit_applies_writes() {
    let store = MemKvStore::new();
    let mut txn = store.begin().unwrap();
    txn.set(b"a", b"1").unwrap();
    txn.set(b"b", b"2").unwrap();

    // not visible before commit
    assert!(store.is_empty());
    assert_eq!(txn.get(b"a").unwrap(), Some(b"1".to_vec()));

    txn.commit().unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.committed_transactions(), 1);
}

#[test]
fn test_transaction_rollback_discards_writes() {
    let store = MemKvStore::new();
    let mut txn = store.begin().unwrap();
    txn.set(b"a", b"1").unwrap();
    txn.rollback();

    assert!(store.is_empty());
    assert_eq!(store.committed_transactions(), 0);
}

#[test]
fn test_transaction_reads_own_clears() {
    let store = MemKvStore::new();
    seed(&store, "t", 3);

    let mut txn = store.begin().unwrap();
    let range = tuple::table_range("t");
    assert_eq!(txn.get_range(&range).unwrap().len(), 3);

    txn.clear(&tuple::pack(&["t", "0"])).unwrap();
    assert_eq!(txn.get_range(&range).unwrap().len(), 2);
    assert_eq!(txn.get(&tuple::pack(&["t", "0"])).unwrap(), None);

    txn.clear_range(&range).unwrap();
    assert!(txn.get_range(&range).unwrap().is_empty());
    txn.set(&tuple::pack(&["t", "9"]), b"late").unwrap();
    assert_eq!(txn.get_range(&range).unwrap().len(), 1);

    // committed data unchanged until commit
    assert_eq!(store.count_range(&range), 3);
    txn.commit().unwrap();
    assert_eq!(store.count_range(&range), 1);
}

#[test]
fn test_get_range_is_ordered() {
    let store = MemKvStore::new();
    seed(&store, "t", 3);

    let txn = store.begin().unwrap();
    let rows = txn.get_range(&tuple::table_range("t")).unwrap();
    let keys: Vec<Vec<String>> = rows.iter().map(|(k, _)| tuple::unpack(k).unwrap()).collect();
    assert_eq!(
        keys,
        vec![
            vec!["t".to_string(), "0".to_string()],
            vec!["t".to_string(), "1".to_string()],
            vec!["t".to_string(), "2".to_string()],
        ]
    );
}

#[test]
fn test_begin_fails_when_unavailable() {
    let store = MemKvStore::new();
    store.set_available(false);
    assert!(matches!(store.begin(), Err(StoreError::Unavailable(_))));

    store.set_available(true);
    assert!(store.begin().is_ok());
}

#[test]
fn test_injected_commit_failure() {
    let store = MemKvStore::new();
    store.fail_next_commits(1);

    let mut txn = store.begin().unwrap();
    txn.set(b"a", b"1").unwrap();
    assert!(matches!(txn.commit(), Err(StoreError::CommitFailed(_))));
    assert!(store.is_empty());

    // only one failure was injected
    let mut txn = store.begin().unwrap();
    txn.set(b"a", b"1").unwrap();
    txn.commit().unwrap();
    assert_eq!(store.len(), 1);
}

#[test]
fn test_gateway_clear_range_only_touches_table() {
    let store = MemKvStore::new();
    seed(&store, "users", 5);
    seed(&store, "users_archive", 4);
    seed(&store, "orders", 2);

    let gateway = StoreGateway::new(Arc::new(store.clone()));
    gateway.clear_range("users").unwrap();

    assert_eq!(store.count_range(&gateway.table_range("users")), 0);
    assert_eq!(store.count_range(&gateway.table_range("users_archive")), 4);
    assert_eq!(store.count_range(&gateway.table_range("orders")), 2);
}

#[test]
fn test_gateway_clear_range_of_empty_table() {
    let store = MemKvStore::new();
    let gateway = StoreGateway::new(Arc::new(store.clone()));
    gateway.clear_range("nothing").unwrap();
    assert_eq!(store.committed_transactions(), 1);
}

#[test]
fn test_gateway_clear_range_commit_failure_keeps_rows() {
    let store = MemKvStore::new();
    seed(&store, "users", 3);
    store.fail_next_commits(1);

    let gateway = StoreGateway::new(Arc::new(store.clone()));
    let result = gateway.clear_range("users");
    assert!(matches!(result, Err(StoreError::CommitFailed(_))));
    assert_eq!(store.count_range(&gateway.table_range("users")), 3);
}

#[test]
fn test_gateway_clear_range_unavailable() {
    let store = MemKvStore::new();
    seed(&store, "users", 2);
    store.set_available(false);

    let gateway = StoreGateway::new(Arc::new(store.clone()));
    assert!(matches!(
        gateway.clear_range("users"),
        Err(StoreError::Unavailable(_))
    ));
}

#[test]
fn test_scope_rolls_back_on_early_return() {
    let store = MemKvStore::new();
    let gateway = StoreGateway::new(Arc::new(store.clone()));

    let result: StoreResult<()> = gateway.run(|txn| {
        txn.set(b"k", b"v")?;
        Err(StoreError::Unavailable("abort".to_string()))
    });

    assert!(result.is_err());
    assert!(store.is_empty());
    assert_eq!(store.committed_transactions(), 0);
}

#[test]
fn test_key_range_contains() {
    let range = KeyRange::new(b"b".to_vec(), b"d".to_vec());
    assert!(!range.contains(b"a"));
    assert!(range.contains(b"b"));
    assert!(range.contains(b"c\xff"));
    assert!(!range.contains(b"d"));
    assert!(KeyRange::new(b"d".to_vec(), b"b".to_vec()).is_empty());
}
