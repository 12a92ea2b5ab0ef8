// crates/cart-store-sqlite/tests/proptest_round_trip.rs
// ============================================================================
// Module: SQLite Round-Trip Property Tests
// Description: Property tests for values persisted through the SQLite store.
// Purpose: Ensure normalized cart fields read back exactly as written.
// Dependencies: cart-core, cart-store-sqlite, proptest, tempfile
// ============================================================================

//! Property-based round-trip tests for [`cart_store_sqlite::SqliteRecordStore`].

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

use cart_core::CollectionName;
use cart_core::CustomerId;
use cart_core::ItemName;
use cart_core::NewLineItem;
use cart_core::Price;
use cart_core::ProductId;
use cart_core::Quantity;
use cart_core::RecordFilter;
use cart_core::RecordStore;
use cart_core::SessionId;
use cart_core::encode_options;
use cart_core::row_key;
use cart_store_sqlite::SqliteRecordStore;
use cart_store_sqlite::SqliteStoreConfig;
use proptest::prelude::*;
use tempfile::TempDir;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn normalized_fields_read_back_unchanged(
        price_raw in "[0-9]{1,9}(\\.[0-9]{0,4})?",
        quantity in 1_u64..=1_000_000,
        name in "[A-Za-z0-9_.: -]{1,24}",
        options in proptest::collection::vec("[a-z0-9]{1,6}", 0..3),
    ) {
        let Ok(price) = Price::normalize(&price_raw) else {
            return Ok(());
        };
        let temp = TempDir::new().unwrap();
        let store =
            SqliteRecordStore::new(SqliteStoreConfig::new(temp.path().join("cart.sqlite"))).unwrap();
        let collection = CollectionName::default();
        let product_id = ProductId::parse("sku-1").unwrap();
        let item = NewLineItem {
            row_key: row_key(&product_id, &options),
            session_id: SessionId::new("sess-a"),
            product_id,
            customer_id: CustomerId::new(7),
            quantity: Quantity::from_raw(quantity).unwrap(),
            price: price.clone(),
            name: ItemName::parse(&name).unwrap(),
            options: encode_options(&options).unwrap(),
        };

        let id = store.insert(&collection, item.clone()).unwrap();
        let rows = store.select(&collection, &RecordFilter::all().with_id(id)).unwrap();

        prop_assert_eq!(rows.len(), 1);
        prop_assert_eq!(&rows[0], &item.with_id(id));
        prop_assert_eq!(rows[0].price.to_string(), price.to_string());
        prop_assert_eq!(rows[0].decoded_options().unwrap(), options);
    }
}
