// crates/cart-store-sqlite/tests/sqlite_store.rs
// ============================================================================
// Module: SQLite Record Store Tests
// Description: Integration tests for the SQLite cart record store.
// Purpose: Validate path safety, schema versioning, per-collection tables,
//          upsert semantics, persistence, and corruption detection.
// ============================================================================

//! ## Overview
//! Integration tests for [`cart_store_sqlite::SqliteRecordStore`]:
//! - Path safety checks (empty/directory/overlong component)
//! - Schema version validation
//! - Record store contract (select/insert/update/delete/upsert)
//! - Cart behavior end to end over a durable store
//! - Fail-closed decoding of tampered rows

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::thread;

use bigdecimal::BigDecimal;
use cart_core::CartItemInput;
use cart_core::CartStore;
use cart_core::CollectionName;
use cart_core::CustomerId;
use cart_core::ItemName;
use cart_core::LineItemPatch;
use cart_core::NewLineItem;
use cart_core::Price;
use cart_core::ProductId;
use cart_core::Quantity;
use cart_core::RecordFilter;
use cart_core::RecordStore;
use cart_core::SessionId;
use cart_core::StoreError;
use cart_core::UpsertOutcome;
use cart_core::row_key;
use cart_store_sqlite::SqliteRecordStore;
use cart_store_sqlite::SqliteStoreConfig;
use cart_store_sqlite::SqliteStoreError;
use cart_store_sqlite::SqliteStoreMode;
use cart_store_sqlite::SqliteSyncMode;
use rusqlite::Connection;
use rusqlite::params;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn store_for(path: &Path) -> SqliteRecordStore {
    SqliteRecordStore::new(SqliteStoreConfig::new(path)).unwrap()
}

fn sample_item(session: &str, product: &str, quantity: u64) -> NewLineItem {
    let product_id = ProductId::parse(product).unwrap();
    NewLineItem {
        row_key: row_key(&product_id, &[]),
        session_id: SessionId::new(session),
        product_id,
        customer_id: CustomerId::new(12),
        quantity: Quantity::from_raw(quantity).unwrap(),
        price: Price::normalize("19.50").unwrap(),
        name: ItemName::parse("Sample Item").unwrap(),
        options: String::new(),
    }
}

// ============================================================================
// SECTION: Path and Schema
// ============================================================================

#[test]
fn sqlite_store_rejects_empty_path() {
    let result = SqliteRecordStore::new(SqliteStoreConfig::new(""));
    assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
}

#[test]
fn sqlite_store_rejects_directory_path() {
    let temp = TempDir::new().unwrap();
    let result = SqliteRecordStore::new(SqliteStoreConfig::new(temp.path()));
    assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
}

#[test]
fn sqlite_store_rejects_overlong_component() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("a".repeat(300));
    let result = SqliteRecordStore::new(SqliteStoreConfig::new(path));
    assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
}

#[test]
fn sqlite_config_validation_checks_limits_without_disk_access() {
    let temp = TempDir::new().unwrap();
    SqliteStoreConfig::new(temp.path()).validate().unwrap();
    let missing = temp.path().join("not-created").join("cart.sqlite");
    SqliteStoreConfig::new(&missing).validate().unwrap();
    assert!(!missing.parent().unwrap().exists());

    let overlong = SqliteStoreConfig::new(temp.path().join("a".repeat(300)));
    assert!(matches!(overlong.validate(), Err(SqliteStoreError::Invalid(_))));
    assert!(matches!(SqliteStoreConfig::new("").validate(), Err(SqliteStoreError::Invalid(_))));
}

#[test]
fn sqlite_store_creates_parent_directories() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("dir").join("cart.sqlite");
    let store = store_for(&path);
    store.readiness().unwrap();
    assert!(path.exists());
}

#[test]
fn sqlite_store_rejects_unknown_schema_version() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("cart.sqlite");
    {
        let connection = Connection::open(&path).unwrap();
        connection
            .execute_batch("CREATE TABLE store_meta (version INTEGER NOT NULL);")
            .unwrap();
        connection.execute("INSERT INTO store_meta (version) VALUES (?1)", params![99]).unwrap();
    }
    let result = SqliteRecordStore::new(SqliteStoreConfig::new(&path));
    assert!(matches!(result, Err(SqliteStoreError::VersionMismatch(_))));
}

#[test]
fn sqlite_store_accepts_delete_journal_and_normal_sync() {
    let temp = TempDir::new().unwrap();
    let config = SqliteStoreConfig {
        path: temp.path().join("cart.sqlite"),
        busy_timeout_ms: 250,
        journal_mode: SqliteStoreMode::Delete,
        sync_mode: SqliteSyncMode::Normal,
    };
    let store = SqliteRecordStore::new(config.clone()).unwrap();
    store.readiness().unwrap();
    assert_eq!(store.config(), &config);
}

#[test]
fn sqlite_store_rejects_reserved_collection_names() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("cart.sqlite"));
    for name in ["store_meta", "sqlite_master"] {
        let collection = CollectionName::parse(name).unwrap();
        let err = store.select(&collection, &RecordFilter::all()).unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)), "{name} should be reserved");
    }
}

// ============================================================================
// SECTION: Record Store Contract
// ============================================================================

#[test]
fn sqlite_store_round_trips_line_items() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("cart.sqlite"));
    let collection = CollectionName::default();

    let mut item = sample_item("s1", "sku-1", 3);
    item.options = "[\"red\",\"L\"]".to_string();
    let id = store.insert(&collection, item.clone()).unwrap();

    let rows = store.select(&collection, &RecordFilter::all().with_id(id)).unwrap();
    assert_eq!(rows, vec![item.with_id(id)]);
    assert_eq!(rows[0].decoded_options().unwrap(), vec!["red".to_string(), "L".to_string()]);
    assert_eq!(rows[0].price.as_decimal(), &BigDecimal::from_str("19.50").unwrap());
}

#[test]
fn sqlite_store_enforces_identity_uniqueness() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("cart.sqlite"));
    let collection = CollectionName::default();

    store.insert(&collection, sample_item("s1", "sku-1", 1)).unwrap();
    let err = store.insert(&collection, sample_item("s1", "sku-1", 2)).unwrap_err();
    assert!(matches!(err, StoreError::Store(_)));
    store.insert(&collection, sample_item("s2", "sku-1", 2)).unwrap();
}

#[test]
fn sqlite_store_filters_updates_and_deletes() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("cart.sqlite"));
    let collection = CollectionName::default();
    store.insert(&collection, sample_item("s1", "a", 1)).unwrap();
    store.insert(&collection, sample_item("s1", "b", 1)).unwrap();
    store.insert(&collection, sample_item("s2", "a", 1)).unwrap();

    let session = SessionId::new("s1");
    assert_eq!(store.select(&collection, &RecordFilter::session(&session)).unwrap().len(), 2);

    let patch = LineItemPatch {
        quantity: Quantity::from_raw(8),
        name: Some(ItemName::parse("Renamed").unwrap()),
        ..LineItemPatch::default()
    };
    let product = ProductId::parse("a").unwrap();
    let touched =
        store.update(&collection, &RecordFilter::all().with_product(&product), &patch).unwrap();
    assert_eq!(touched, 2);
    for row in store.select(&collection, &RecordFilter::all().with_product(&product)).unwrap() {
        assert_eq!(row.quantity.get(), 8);
        assert_eq!(row.name.as_str(), "Renamed");
    }

    assert_eq!(store.update(&collection, &RecordFilter::all(), &LineItemPatch::default()).unwrap(), 0);
    assert_eq!(store.delete(&collection, &RecordFilter::session(&session)).unwrap(), 2);
    assert_eq!(store.select(&collection, &RecordFilter::all()).unwrap().len(), 1);
}

#[test]
fn sqlite_store_upsert_reports_created_then_merged() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("cart.sqlite"));
    let collection = CollectionName::default();
    let item = sample_item("s1", "sku-1", 1);
    let merge = LineItemPatch::merge_from(&sample_item("s1", "sku-1", 6));

    let created = store.upsert(&collection, item.clone(), &merge).unwrap();
    assert!(matches!(created, UpsertOutcome::Created(_)));
    let merged = store.upsert(&collection, item, &merge).unwrap();
    assert_eq!(merged, UpsertOutcome::Merged(created.id()));

    let rows = store.select(&collection, &RecordFilter::all()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].quantity.get(), 6);
}

#[test]
fn sqlite_store_collections_use_separate_tables() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("cart.sqlite");
    let store = store_for(&path);
    let primary = CollectionName::default();
    let archive = CollectionName::parse("archived_carts").unwrap();
    store.insert(&primary, sample_item("s1", "a", 1)).unwrap();
    store.insert(&archive, sample_item("s1", "a", 1)).unwrap();

    assert_eq!(store.select(&primary, &RecordFilter::all()).unwrap().len(), 1);
    assert_eq!(store.select(&archive, &RecordFilter::all()).unwrap().len(), 1);

    let connection = Connection::open(&path).unwrap();
    let tables: i64 = connection
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN (?1, ?2)",
            params!["order_data_temps", "archived_carts"],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 2);
}

#[test]
fn sqlite_store_persists_across_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("cart.sqlite");
    let collection = CollectionName::default();
    {
        let store = store_for(&path);
        store.insert(&collection, sample_item("s1", "sku-1", 4)).unwrap();
    }
    let store = store_for(&path);
    let rows = store.select(&collection, &RecordFilter::all()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].quantity.get(), 4);
}

#[test]
fn sqlite_store_rejects_tampered_rows() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("cart.sqlite");
    let store = store_for(&path);
    let collection = CollectionName::default();
    store.insert(&collection, sample_item("s1", "sku-1", 1)).unwrap();

    {
        let connection = Connection::open(&path).unwrap();
        connection.execute("UPDATE order_data_temps SET quantity = 0", params![]).unwrap();
    }
    let err = store.select(&collection, &RecordFilter::all()).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)));

    {
        let connection = Connection::open(&path).unwrap();
        connection
            .execute("UPDATE order_data_temps SET quantity = 1, price = 'abc'", params![])
            .unwrap();
    }
    let err = store.select(&collection, &RecordFilter::all()).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)));
}

// ============================================================================
// SECTION: Cart Integration
// ============================================================================

#[test]
fn sqlite_store_backs_cart_operations() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("cart.sqlite"));
    let cart = CartStore::new(store, SessionId::new("sess-a"), CollectionName::default());

    cart.insert(&CartItemInput::new("a", "3", "2.50", "A"), CustomerId::NONE).unwrap();
    cart.insert(&CartItemInput::new("b", "1", "5", "B"), CustomerId::NONE).unwrap();
    cart.insert(&CartItemInput::new("a", "2", "2.50", "A"), CustomerId::NONE).unwrap();

    assert_eq!(cart.total_items().unwrap(), 3);
    assert_eq!(cart.total_amount().unwrap(), BigDecimal::from_str("10.00").unwrap());

    let key = row_key(&ProductId::parse("b").unwrap(), &[]);
    cart.update(&CartItemInput::default().with_quantity("4"), &key, CustomerId::new(9)).unwrap();
    assert_eq!(cart.total_items().unwrap(), 6);

    cart.remove_item(&key).unwrap();
    assert_eq!(cart.total_items().unwrap(), 2);
    cart.remove_all_items().unwrap();
    assert!(cart.items().unwrap().is_empty());
}

#[test]
fn sqlite_store_concurrent_inserts_collapse_to_one_row() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(store_for(&temp.path().join("cart.sqlite")));
    let mut handles = Vec::new();
    for worker in 1_u64 ..= 8 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            let cart =
                CartStore::new(store.as_ref().clone(), SessionId::new("shared"), CollectionName::default());
            let input = CartItemInput::new("sku-1", worker.to_string(), "1.00", "Item");
            cart.insert(&input, CustomerId::NONE).unwrap();
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    let rows = store.select(&CollectionName::default(), &RecordFilter::all()).unwrap();
    assert_eq!(rows.len(), 1);
}
