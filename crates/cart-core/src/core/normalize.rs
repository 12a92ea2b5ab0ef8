// crates/cart-core/src/core/normalize.rs
// ============================================================================
// Module: Cart Input Normalization
// Description: Numeric coercion and character-class validation for cart input.
// Purpose: Guarantee persisted quantities, prices, and labels are well-formed.
// Dependencies: bigdecimal, serde, thiserror
// ============================================================================

//! ## Overview
//! Cart input arrives as loosely formatted text. Quantities keep only their
//! digits, prices keep only digits and the decimal point, and both drop
//! leading zeros before being checked. Product identifiers and item names are
//! never rewritten: any character outside their allowed class rejects the
//! value outright.
//!
//! The validated types in this module can only be produced by these rules,
//! so a [`Quantity`] or [`Price`] held anywhere in the crate is already
//! normalized.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Rejections
// ============================================================================

/// Reasons a single input field fails normalization.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputRejection {
    /// Quantity contained no digits at all.
    #[error("quantity contains no digits")]
    QuantityEmpty,
    /// Quantity consisted only of zeros.
    #[error("quantity must be greater than zero")]
    QuantityZero,
    /// Quantity does not fit the supported integer range.
    #[error("quantity exceeds the supported range")]
    QuantityOverflow,
    /// Price had no significant digits after stripping.
    #[error("price contains no significant digits")]
    PriceEmpty,
    /// Price was not a single decimal number after stripping.
    #[error("price is not a decimal number")]
    PriceMalformed,
    /// Price was negative (only reachable through direct construction).
    #[error("price must not be negative")]
    PriceNegative,
    /// Product identifier contained a disallowed character.
    #[error("product id may only contain letters, digits, '.', '_' and '-'")]
    ProductIdDisallowed,
    /// Item name contained a disallowed character.
    #[error("item name may only contain letters, digits, spaces, '.', ':', '_' and '-'")]
    NameDisallowed,
}

// ============================================================================
// SECTION: Quantity
// ============================================================================

/// Normalized positive item quantity.
///
/// # Invariants
/// - Always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(NonZeroU64);

impl Quantity {
    /// Normalizes raw quantity text.
    ///
    /// Every non-digit character is dropped, then leading zeros. `"007"`
    /// becomes `7` and `"12abc"` becomes `12`.
    ///
    /// # Errors
    ///
    /// Returns [`InputRejection`] when no digits remain, the value is zero,
    /// or it overflows `u64`.
    pub fn normalize(raw: &str) -> Result<Self, InputRejection> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Err(InputRejection::QuantityEmpty);
        }
        let significant = digits.trim_start_matches('0');
        if significant.is_empty() {
            return Err(InputRejection::QuantityZero);
        }
        let value: u64 = significant.parse().map_err(|_| InputRejection::QuantityOverflow)?;
        NonZeroU64::new(value).map(Self).ok_or(InputRejection::QuantityZero)
    }

    /// Creates a quantity from a raw value (returns `None` if zero).
    #[must_use]
    pub fn from_raw(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    /// Returns the quantity value (always >= 1).
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.get().fmt(f)
    }
}

// ============================================================================
// SECTION: Price
// ============================================================================

/// Normalized non-negative unit price.
///
/// # Invariants
/// - Never negative.
/// - Scale is preserved from the input text (`"19.50"` keeps two places).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "BigDecimal", into = "BigDecimal")]
pub struct Price(BigDecimal);

impl Price {
    /// Normalizes raw price text.
    ///
    /// Every character other than a digit or `.` is dropped, then leading
    /// zeros. A minus sign is therefore discarded rather than rejected.
    /// `"0019.50"` becomes `19.50` and `"0.5"` becomes `0.5`; `"0"` has no
    /// significant digits and is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`InputRejection`] when nothing numeric remains or more than
    /// one decimal point is present.
    pub fn normalize(raw: &str) -> Result<Self, InputRejection> {
        let kept: String = raw.chars().filter(|ch| ch.is_ascii_digit() || *ch == '.').collect();
        let significant = kept.trim_start_matches('0');
        if !significant.chars().any(|ch| ch.is_ascii_digit()) {
            return Err(InputRejection::PriceEmpty);
        }
        if significant.matches('.').count() > 1 {
            return Err(InputRejection::PriceMalformed);
        }
        let trimmed = significant.strip_suffix('.').unwrap_or(significant);
        let canonical =
            if trimmed.starts_with('.') { format!("0{trimmed}") } else { trimmed.to_string() };
        BigDecimal::from_str(&canonical).map(Self).map_err(|_| InputRejection::PriceMalformed)
    }

    /// Wraps an existing decimal value.
    ///
    /// # Errors
    ///
    /// Returns [`InputRejection::PriceNegative`] for negative values.
    pub fn from_decimal(value: BigDecimal) -> Result<Self, InputRejection> {
        if value < BigDecimal::from(0) {
            return Err(InputRejection::PriceNegative);
        }
        Ok(Self(value))
    }

    /// Returns the price as a decimal.
    #[must_use]
    pub const fn as_decimal(&self) -> &BigDecimal {
        &self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<BigDecimal> for Price {
    type Error = InputRejection;

    fn try_from(value: BigDecimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl From<Price> for BigDecimal {
    fn from(value: Price) -> Self {
        value.0
    }
}

// ============================================================================
// SECTION: Product Identifier
// ============================================================================

/// Product identifier as supplied by the catalog.
///
/// # Invariants
/// - Non-empty; every character is an ascii letter, digit, `.`, `_` or `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    /// Validates a product identifier.
    ///
    /// # Errors
    ///
    /// Returns [`InputRejection::ProductIdDisallowed`] when any character is
    /// outside the allowed class or the value is empty.
    pub fn parse(value: &str) -> Result<Self, InputRejection> {
        if value.is_empty() || !value.chars().all(is_product_id_char) {
            return Err(InputRejection::ProductIdDisallowed);
        }
        Ok(Self(value.to_string()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for ProductId {
    type Error = InputRejection;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProductId> for String {
    fn from(value: ProductId) -> Self {
        value.0
    }
}

// ============================================================================
// SECTION: Item Name
// ============================================================================

/// Display name of a line item.
///
/// # Invariants
/// - Non-empty; every character is an ascii letter, digit, space, `.`, `:`,
///   `_` or `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(String);

impl ItemName {
    /// Validates an item name.
    ///
    /// # Errors
    ///
    /// Returns [`InputRejection::NameDisallowed`] when any character is
    /// outside the allowed class or the value is empty.
    pub fn parse(value: &str) -> Result<Self, InputRejection> {
        if value.is_empty() || !value.chars().all(is_name_char) {
            return Err(InputRejection::NameDisallowed);
        }
        Ok(Self(value.to_string()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for ItemName {
    type Error = InputRejection;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ItemName> for String {
    fn from(value: ItemName) -> Self {
        value.0
    }
}

// ============================================================================
// SECTION: Character Classes
// ============================================================================

/// Returns true for characters allowed in product identifiers.
const fn is_product_id_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-')
}

/// Returns true for characters allowed in item names.
const fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | ':' | '-' | '_' | ' ')
}
