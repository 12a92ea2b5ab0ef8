// crates/cart-core/src/core/item.rs
// ============================================================================
// Module: Cart Line Items
// Description: Caller payloads and persisted line-item records.
// Purpose: Define the record shape exchanged with record stores.
// Dependencies: bigdecimal, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`CartItemInput`] is the loosely typed payload a caller hands to the cart;
//! every field is optional so that the same shape serves inserts and sparse
//! updates. [`NewLineItem`] and [`LineItem`] are the persisted record before
//! and after the store assigns an identifier.
//!
//! Options are persisted as an opaque string: a JSON array of strings, or the
//! empty string when the item has no options. Records keep that string as-is;
//! [`LineItem::decoded_options`] decodes it on demand.

// ============================================================================
// SECTION: Imports
// ============================================================================

use bigdecimal::BigDecimal;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::CustomerId;
use crate::core::identifiers::LineItemId;
use crate::core::identifiers::RowKey;
use crate::core::identifiers::SessionId;
use crate::core::normalize::ItemName;
use crate::core::normalize::Price;
use crate::core::normalize::ProductId;
use crate::core::normalize::Quantity;

// ============================================================================
// SECTION: Caller Payload
// ============================================================================

/// Raw line-item payload supplied by a caller.
///
/// # Invariants
/// - No field is validated until the payload reaches the cart.
/// - `quantity` and `price` accept JSON strings or numbers when deserialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItemInput {
    /// Product identifier.
    #[serde(default)]
    pub product_id: Option<String>,
    /// Quantity text, normalized to a positive integer.
    #[serde(default, deserialize_with = "deserialize_scalar")]
    pub quantity: Option<String>,
    /// Price text, normalized to a non-negative decimal.
    #[serde(default, deserialize_with = "deserialize_scalar")]
    pub price: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Ordered option values distinguishing variants of a product.
    #[serde(default)]
    pub options: Vec<String>,
}

impl CartItemInput {
    /// Creates a payload with all fields required for an insert.
    #[must_use]
    pub fn new(
        product_id: impl Into<String>,
        quantity: impl Into<String>,
        price: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            product_id: Some(product_id.into()),
            quantity: Some(quantity.into()),
            price: Some(price.into()),
            name: Some(name.into()),
            options: Vec::new(),
        }
    }

    /// Sets the product identifier.
    #[must_use]
    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    /// Sets the quantity text.
    #[must_use]
    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = Some(quantity.into());
        self
    }

    /// Sets the price text.
    #[must_use]
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the ordered option values.
    #[must_use]
    pub fn with_options<I, T>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Returns true when the payload carries no field at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.product_id.is_none()
            && self.quantity.is_none()
            && self.price.is_none()
            && self.name.is_none()
            && self.options.is_empty()
    }
}

/// Scalar accepted for numeric payload fields.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    /// Textual value, kept verbatim.
    Text(String),
    /// Numeric value, rendered with its JSON text form.
    Number(serde_json::Number),
}

/// Deserializes an optional string-or-number field into text.
fn deserialize_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawScalar>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        RawScalar::Text(text) => text,
        RawScalar::Number(number) => number.to_string(),
    }))
}

// ============================================================================
// SECTION: Options Encoding
// ============================================================================

/// Errors raised when encoding or decoding persisted options.
#[derive(Debug, Error)]
pub enum OptionsError {
    /// Options could not be serialized.
    #[error("failed to encode options: {0}")]
    Encode(String),
    /// Persisted options were not a JSON array of strings.
    #[error("failed to decode options: {0}")]
    Decode(String),
}

/// Encodes ordered option values into their persisted form.
///
/// # Errors
///
/// Returns [`OptionsError::Encode`] when serialization fails.
pub fn encode_options(options: &[String]) -> Result<String, OptionsError> {
    if options.is_empty() {
        return Ok(String::new());
    }
    serde_json::to_string(options).map_err(|err| OptionsError::Encode(err.to_string()))
}

/// Decodes persisted options back into ordered values.
///
/// # Errors
///
/// Returns [`OptionsError::Decode`] when the text is not a JSON array of strings.
pub fn decode_options(encoded: &str) -> Result<Vec<String>, OptionsError> {
    if encoded.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(encoded).map_err(|err| OptionsError::Decode(err.to_string()))
}

// ============================================================================
// SECTION: Persisted Records
// ============================================================================

/// Line item ready to be written by a record store.
///
/// # Invariants
/// - `row_key` was derived from `product_id` and the options encoded in `options`.
/// - `quantity` and `price` are normalized values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLineItem {
    /// Content-derived identity within the session.
    pub row_key: RowKey,
    /// Owning session.
    pub session_id: SessionId,
    /// Product identifier.
    pub product_id: ProductId,
    /// Associated customer (zero when none).
    pub customer_id: CustomerId,
    /// Normalized quantity.
    pub quantity: Quantity,
    /// Normalized unit price.
    pub price: Price,
    /// Display name.
    pub name: ItemName,
    /// Persisted options (empty string when none).
    pub options: String,
}

impl NewLineItem {
    /// Attaches a store-generated identifier.
    #[must_use]
    pub fn with_id(self, id: LineItemId) -> LineItem {
        LineItem {
            id,
            row_key: self.row_key,
            session_id: self.session_id,
            product_id: self.product_id,
            customer_id: self.customer_id,
            quantity: self.quantity,
            price: self.price,
            name: self.name,
            options: self.options,
        }
    }
}

/// Persisted cart line item.
///
/// # Invariants
/// - At most one record exists per `(session_id, product_id, row_key)`.
/// - `quantity` and `price` are normalized values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Store-generated identifier.
    pub id: LineItemId,
    /// Content-derived identity within the session.
    pub row_key: RowKey,
    /// Owning session.
    pub session_id: SessionId,
    /// Product identifier.
    pub product_id: ProductId,
    /// Associated customer (zero when none).
    pub customer_id: CustomerId,
    /// Normalized quantity.
    pub quantity: Quantity,
    /// Normalized unit price.
    pub price: Price,
    /// Display name.
    pub name: ItemName,
    /// Persisted options (empty string when none).
    pub options: String,
}

impl LineItem {
    /// Decodes the persisted options.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::Decode`] when the stored text is malformed.
    pub fn decoded_options(&self) -> Result<Vec<String>, OptionsError> {
        decode_options(&self.options)
    }

    /// Returns `price * quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> BigDecimal {
        self.price.as_decimal() * &BigDecimal::from(self.quantity.get())
    }
}
