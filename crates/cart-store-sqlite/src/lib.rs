// crates/cart-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Cart Record Store
// Description: Durable RecordStore backend using SQLite.
// Purpose: Persist cart line items across process restarts.
// Dependencies: cart-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`cart_core::RecordStore`]. Each cart
//! collection maps to its own table, created on first use, carrying the
//! `(session_id, product_id, row_key)` uniqueness constraint so concurrent
//! inserts of the same line item collapse into one row.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SqliteRecordStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
