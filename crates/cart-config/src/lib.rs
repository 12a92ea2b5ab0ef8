// crates/cart-config/src/lib.rs
// ============================================================================
// Module: Cart Config Library
// Description: Canonical config model, validation, and store construction.
// Purpose: Single source of truth for cart.toml semantics.
// Dependencies: cart-core, cart-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `cart-config` defines the configuration model for cart hosts: the default
//! collection seeded into new sessions and the record store backend. It
//! provides strict, fail-closed validation and a canonical example file.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
