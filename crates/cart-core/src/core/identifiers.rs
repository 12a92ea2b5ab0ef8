// crates/cart-core/src/core/identifiers.rs
// ============================================================================
// Module: Cart Identifiers
// Description: Strongly typed identifiers for sessions, records, and collections.
// Purpose: Provide serializable identifiers with stable wire forms.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! This module defines the identifiers that partition and address cart rows.
//! Session identifiers are opaque strings supplied by the host session layer.
//! Record identifiers are generated by the backing store and are always
//! non-zero. Collection names are validated at construction so that every
//! store backend may use them directly as table or region names.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroU64;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default collection holding cart rows when no override is configured.
pub const DEFAULT_COLLECTION_NAME: &str = "order_data_temps";
/// Maximum length of a collection name.
pub const MAX_COLLECTION_NAME_LENGTH: usize = 64;

// ============================================================================
// SECTION: Session Identifier
// ============================================================================

/// Identity of the visitor session that owns cart rows.
///
/// # Invariants
/// - Opaque UTF-8 string; never empty when constructed via [`SessionId::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a new session identifier without validation.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a session identifier, returning `None` for empty input.
    #[must_use]
    pub fn parse(id: &str) -> Option<Self> {
        if id.is_empty() { None } else { Some(Self(id.to_string())) }
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Line Item Identifier
// ============================================================================

/// Store-generated identifier of a persisted line item.
///
/// # Invariants
/// - Always >= 1 (non-zero, 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(NonZeroU64);

impl LineItemId {
    /// Creates a new line item identifier from a non-zero value.
    #[must_use]
    pub const fn new(id: NonZeroU64) -> Self {
        Self(id)
    }

    /// Creates a line item identifier from a raw value (returns `None` if zero).
    #[must_use]
    pub fn from_raw(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    /// Returns the raw identifier value (always >= 1).
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for LineItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.get().fmt(f)
    }
}

// ============================================================================
// SECTION: Customer Identifier
// ============================================================================

/// Optional customer association for a line item.
///
/// # Invariants
/// - Zero means "no customer".
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CustomerId(u64);

impl CustomerId {
    /// Customer identifier meaning "no customer".
    pub const NONE: Self = Self(0);

    /// Creates a customer identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns true when a customer is associated.
    #[must_use]
    pub const fn is_set(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for CustomerId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

// ============================================================================
// SECTION: Row Key
// ============================================================================

/// Content-derived identity of a product + options combination.
///
/// # Invariants
/// - Unique only in combination with a [`SessionId`].
/// - Produced by [`crate::core::hashing::row_key`] for new rows; values read
///   back from a store or supplied by callers are treated as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowKey(String);

impl RowKey {
    /// Creates a row key from an existing digest string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the row key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for RowKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Collection Name
// ============================================================================

/// Name of the backing collection that holds cart rows.
///
/// # Invariants
/// - Matches `^[A-Za-z_][A-Za-z0-9_]*$`.
/// - At most [`MAX_COLLECTION_NAME_LENGTH`] bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionName(String);

impl CollectionName {
    /// Parses and validates a collection name.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCollectionName`] when the name is empty, too long, or
    /// contains characters outside `[A-Za-z0-9_]`.
    pub fn parse(value: &str) -> Result<Self, InvalidCollectionName> {
        if value.is_empty() {
            return Err(InvalidCollectionName::Empty);
        }
        if value.len() > MAX_COLLECTION_NAME_LENGTH {
            return Err(InvalidCollectionName::TooLong);
        }
        if value.starts_with(|ch: char| ch.is_ascii_digit()) {
            return Err(InvalidCollectionName::LeadingDigit);
        }
        if !value.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
            return Err(InvalidCollectionName::DisallowedChar);
        }
        Ok(Self(value.to_string()))
    }

    /// Returns the collection name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CollectionName {
    fn default() -> Self {
        Self(DEFAULT_COLLECTION_NAME.to_string())
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for CollectionName {
    type Error = InvalidCollectionName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CollectionName> for String {
    fn from(value: CollectionName) -> Self {
        value.0
    }
}

/// Rejection reasons for collection names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidCollectionName {
    /// Name was empty.
    #[error("collection name must not be empty")]
    Empty,
    /// Name exceeded [`MAX_COLLECTION_NAME_LENGTH`].
    #[error("collection name exceeds {MAX_COLLECTION_NAME_LENGTH} bytes")]
    TooLong,
    /// Name started with a digit.
    #[error("collection name must not start with a digit")]
    LeadingDigit,
    /// Name contained characters outside `[A-Za-z0-9_]`.
    #[error("collection name may only contain ascii letters, digits, and underscores")]
    DisallowedChar,
}
