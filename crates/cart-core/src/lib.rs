// crates/cart-core/src/lib.rs
// ============================================================================
// Module: Cart Core Library
// Description: Public API surface for the session cart core.
// Purpose: Expose cart types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Cart core keeps line items for a visitor session in a shared record store.
//! It owns the rules that decide whether an add creates a row or merges into
//! one, how quantities and prices are coerced, and which characters product
//! ids and names may carry. Storage engines and session layers integrate
//! through explicit interfaces.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::COLLECTION_CONFIG_KEY;
pub use interfaces::LineItemPatch;
pub use interfaces::RecordFilter;
pub use interfaces::RecordStore;
pub use interfaces::SessionContext;
pub use interfaces::StoreError;
pub use interfaces::UpsertOutcome;
pub use runtime::CartError;
pub use runtime::CartStore;
pub use runtime::InMemoryRecordStore;
pub use runtime::InMemorySessionContext;
pub use runtime::SharedRecordStore;
pub use runtime::establish_session;
