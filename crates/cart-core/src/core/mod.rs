// crates/cart-core/src/core/mod.rs
// ============================================================================
// Module: Cart Core Types
// Description: Identifiers, normalized values, records, and display helpers.
// Purpose: Provide stable, serializable types shared by cart stores and runtime.
// Dependencies: bigdecimal, serde, sha2
// ============================================================================

//! ## Overview
//! Core types define what a cart line item is and how raw caller input turns
//! into one. They carry no storage or session behavior; record stores and the
//! cart runtime build on them.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod format;
pub mod hashing;
pub mod identifiers;
pub mod item;
pub mod normalize;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use format::format_decimal;
pub use format::format_number;
pub use hashing::row_key;
pub use identifiers::CollectionName;
pub use identifiers::CustomerId;
pub use identifiers::DEFAULT_COLLECTION_NAME;
pub use identifiers::InvalidCollectionName;
pub use identifiers::LineItemId;
pub use identifiers::RowKey;
pub use identifiers::SessionId;
pub use item::CartItemInput;
pub use item::LineItem;
pub use item::NewLineItem;
pub use item::OptionsError;
pub use item::decode_options;
pub use item::encode_options;
pub use normalize::InputRejection;
pub use normalize::ItemName;
pub use normalize::Price;
pub use normalize::ProductId;
pub use normalize::Quantity;
