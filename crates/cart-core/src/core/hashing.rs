// crates/cart-core/src/core/hashing.rs
// ============================================================================
// Module: Cart Content Hashing
// Description: Content digests and row-key derivation for cart line items.
// Purpose: Provide deterministic identities so repeated adds merge in place.
// Dependencies: sha2
// ============================================================================

//! ## Overview
//! A line item's row key is the digest of its product identifier followed by
//! its option values, concatenated in the given order with no separator. The
//! digest is deterministic across processes so that adding the same product
//! and options twice in one session converges on a single row.

// ============================================================================
// SECTION: Imports
// ============================================================================

use sha2::Digest;
use sha2::Sha256;

use crate::core::identifiers::RowKey;
use crate::core::normalize::ProductId;

// ============================================================================
// SECTION: Row Keys
// ============================================================================

/// Derives the row key for a product and its ordered option values.
///
/// With no options the key is the digest of the product identifier alone.
/// Option values are joined without a separator, so `["ab"]` and
/// `["a", "b"]` produce the same key.
#[must_use]
pub fn row_key(product_id: &ProductId, options: &[String]) -> RowKey {
    let mut material = String::from(product_id.as_str());
    for option in options {
        material.push_str(option);
    }
    RowKey::new(sha256_hex(material.as_bytes()))
}

// ============================================================================
// SECTION: Digest Encoding
// ============================================================================

/// Returns the lowercase hex SHA-256 digest of `bytes`.
fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex_encode(&hasher.finalize())
}

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}
