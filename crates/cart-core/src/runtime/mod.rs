// crates/cart-core/src/runtime/mod.rs
// ============================================================================
// Module: Cart Runtime
// Description: Cart operations plus in-memory store and session helpers.
// Purpose: Execute cart operations against any record store.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement the cart operations and the in-memory
//! collaborators used by tests and embedded hosts. Durable stores live in
//! their own crates and plug in through [`crate::interfaces::RecordStore`].

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod cart;
pub mod session;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use cart::CartError;
pub use cart::CartStore;
pub use session::InMemorySessionContext;
pub use session::establish_session;
pub use store::InMemoryRecordStore;
pub use store::SharedRecordStore;
