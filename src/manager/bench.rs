use criterion::{Criterion, criterion_group, criterion_main};
use std::sync::Arc;
use std::thread;

use kvcatalog::manager::TableManager;
use kvcatalog::store::{MemKvStore, StoreGateway, tuple};
use kvcatalog::types::AttributeType;

// Test configuration
const THREAD_COUNT: usize = 4;
const TABLES_PER_THREAD: usize = 250;
const ROWS_PER_TABLE: usize = 64;

fn create_tables(manager: &TableManager, prefix: &str, count: usize) {
    for i in 0..count {
        let name = format!("{}_{}", prefix, i);
        manager
            .create_table(
                &name,
                &["id", "name", "score"],
                &[AttributeType::Int, AttributeType::Varchar, AttributeType::Double],
                &["id"],
            )
            .unwrap();
    }
}

// Create then delete tables with no stored rows
pub fn bench_create_delete_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("CreateDelete");

    group.bench_function("EmptyTables", |b| {
        b.iter(|| {
            let manager = TableManager::new(Arc::new(MemKvStore::new()));
            create_tables(&manager, "t", TABLES_PER_THREAD);
            manager.drop_all_tables().unwrap();
        });
    });

    group.finish();
}

// Delete tables whose key ranges hold rows
pub fn bench_delete_with_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("CreateDelete");

    group.bench_function("TablesWithRows", |b| {
        b.iter(|| {
            let store = MemKvStore::new();
            let manager = TableManager::new(Arc::new(store.clone()));
            create_tables(&manager, "t", 32);

            let gateway = StoreGateway::new(Arc::new(store));
            for name in manager.table_names() {
                gateway
                    .run(|txn| {
                        for row in 0..ROWS_PER_TABLE {
                            txn.set(&tuple::pack(&[name.clone(), row.to_string()]), b"row")?;
                        }
                        Ok(())
                    })
                    .unwrap();
            }

            for name in manager.table_names() {
                manager.delete_table(&name).unwrap();
            }
        });
    });

    group.finish();
}

// Concurrent creates on one manager
pub fn bench_concurrent_creates(c: &mut Criterion) {
    let mut group = c.benchmark_group("ConcurrentCreates");

    group.bench_function("TableManager", |b| {
        b.iter(|| {
            let manager = Arc::new(TableManager::new(Arc::new(MemKvStore::new())));

            let handles: Vec<_> = (0..THREAD_COUNT)
                .map(|thread_id| {
                    let manager = manager.clone();
                    thread::spawn(move || {
                        create_tables(&manager, &format!("t{}", thread_id), TABLES_PER_THREAD);
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_create_delete_churn,
    bench_delete_with_rows,
    bench_concurrent_creates
);

criterion_main!(benches);
