// crates/cart-core/src/interfaces/mod.rs
// ============================================================================
// Module: Cart Interfaces
// Description: Backend-agnostic interfaces for record storage and sessions.
// Purpose: Define the contract surfaces the cart runtime depends on.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The cart runtime never talks to a concrete database or session layer.
//! It builds filters and patches and hands them to a [`RecordStore`], and it
//! learns who the caller is from a [`SessionContext`]. Filters are
//! conjunctions of equality predicates; an empty filter matches every record
//! in the collection.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::CollectionName;
use crate::core::CustomerId;
use crate::core::ItemName;
use crate::core::LineItem;
use crate::core::LineItemId;
use crate::core::NewLineItem;
use crate::core::Price;
use crate::core::ProductId;
use crate::core::Quantity;
use crate::core::RowKey;
use crate::core::SessionId;

// ============================================================================
// SECTION: Filters
// ============================================================================

/// Conjunction of equality predicates over line-item fields.
///
/// # Invariants
/// - `None` fields do not constrain the match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Match on record identifier.
    pub id: Option<LineItemId>,
    /// Match on owning session.
    pub session_id: Option<SessionId>,
    /// Match on product identifier.
    pub product_id: Option<ProductId>,
    /// Match on row key.
    pub row_key: Option<RowKey>,
}

impl RecordFilter {
    /// Returns a filter matching every record.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Returns a filter matching every record of a session.
    #[must_use]
    pub fn session(session_id: &SessionId) -> Self {
        Self::default().with_session(session_id)
    }

    /// Constrains the filter to a record identifier.
    #[must_use]
    pub const fn with_id(mut self, id: LineItemId) -> Self {
        self.id = Some(id);
        self
    }

    /// Constrains the filter to a session.
    #[must_use]
    pub fn with_session(mut self, session_id: &SessionId) -> Self {
        self.session_id = Some(session_id.clone());
        self
    }

    /// Constrains the filter to a product.
    #[must_use]
    pub fn with_product(mut self, product_id: &ProductId) -> Self {
        self.product_id = Some(product_id.clone());
        self
    }

    /// Constrains the filter to a row key.
    #[must_use]
    pub fn with_row_key(mut self, row_key: &RowKey) -> Self {
        self.row_key = Some(row_key.clone());
        self
    }

    /// Returns true when the record satisfies every predicate.
    #[must_use]
    pub fn matches(&self, item: &LineItem) -> bool {
        self.id.is_none_or(|id| item.id == id)
            && self.session_id.as_ref().is_none_or(|session| item.session_id == *session)
            && self.product_id.as_ref().is_none_or(|product| item.product_id == *product)
            && self.row_key.as_ref().is_none_or(|key| item.row_key == *key)
    }
}

// ============================================================================
// SECTION: Patches
// ============================================================================

/// Sparse set of field writes applied to matching records.
///
/// # Invariants
/// - Values are already normalized; stores apply them verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineItemPatch {
    /// Replacement product identifier.
    pub product_id: Option<ProductId>,
    /// Replacement customer association.
    pub customer_id: Option<CustomerId>,
    /// Replacement quantity.
    pub quantity: Option<Quantity>,
    /// Replacement unit price.
    pub price: Option<Price>,
    /// Replacement display name.
    pub name: Option<ItemName>,
    /// Replacement persisted options.
    pub options: Option<String>,
}

impl LineItemPatch {
    /// Builds the patch used when an insert merges into an existing record.
    ///
    /// Only quantity, price, and name are carried; customer and options stay
    /// as first written.
    #[must_use]
    pub fn merge_from(item: &NewLineItem) -> Self {
        Self {
            quantity: Some(item.quantity),
            price: Some(item.price.clone()),
            name: Some(item.name.clone()),
            ..Self::default()
        }
    }

    /// Returns true when the patch writes no field.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.product_id.is_none()
            && self.customer_id.is_none()
            && self.quantity.is_none()
            && self.price.is_none()
            && self.name.is_none()
            && self.options.is_none()
    }

    /// Applies the patch to a record in place.
    pub fn apply(&self, item: &mut LineItem) {
        if let Some(product_id) = &self.product_id {
            item.product_id = product_id.clone();
        }
        if let Some(customer_id) = self.customer_id {
            item.customer_id = customer_id;
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(price) = &self.price {
            item.price = price.clone();
        }
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(options) = &self.options {
            item.options.clone_from(options);
        }
    }
}

// ============================================================================
// SECTION: Record Store
// ============================================================================

/// Record store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("record store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("record store corruption: {0}")]
    Corrupt(String),
    /// Store data version is incompatible.
    #[error("record store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("record store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("record store error: {0}")]
    Store(String),
}

/// Result of an insert-or-merge write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new record was created.
    Created(LineItemId),
    /// An existing record was updated in place.
    Merged(LineItemId),
}

impl UpsertOutcome {
    /// Returns the identifier of the written record.
    #[must_use]
    pub const fn id(self) -> LineItemId {
        match self {
            Self::Created(id) | Self::Merged(id) => id,
        }
    }
}

/// Collection-addressed store of cart line items.
pub trait RecordStore {
    /// Returns every record in the collection matching the filter, in no
    /// particular order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn select(
        &self,
        collection: &CollectionName,
        filter: &RecordFilter,
    ) -> Result<Vec<LineItem>, StoreError>;

    /// Inserts a record and returns its generated identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn insert(&self, collection: &CollectionName, item: NewLineItem)
    -> Result<LineItemId, StoreError>;

    /// Applies a patch to every matching record and returns the number touched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn update(
        &self,
        collection: &CollectionName,
        filter: &RecordFilter,
        patch: &LineItemPatch,
    ) -> Result<u64, StoreError>;

    /// Deletes every matching record and returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn delete(&self, collection: &CollectionName, filter: &RecordFilter)
    -> Result<u64, StoreError>;

    /// Inserts `item`, or applies `merge` to the record already holding its
    /// `(session_id, product_id, row_key)` identity.
    ///
    /// The provided implementation reads then writes and is not atomic;
    /// stores that can perform a conditional write should override it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read or write fails.
    fn upsert(
        &self,
        collection: &CollectionName,
        item: NewLineItem,
        merge: &LineItemPatch,
    ) -> Result<UpsertOutcome, StoreError> {
        let identity = RecordFilter::session(&item.session_id)
            .with_product(&item.product_id)
            .with_row_key(&item.row_key);
        let existing = self.select(collection, &identity)?;
        if let Some(record) = existing.first() {
            self.update(collection, &RecordFilter::all().with_id(record.id), merge)?;
            return Ok(UpsertOutcome::Merged(record.id));
        }
        self.insert(collection, item).map(UpsertOutcome::Created)
    }
}

// ============================================================================
// SECTION: Session Context
// ============================================================================

/// Session slot holding the active collection name.
pub const COLLECTION_CONFIG_KEY: &str = "cart.collection";

/// Caller session supplying identity and per-session configuration slots.
pub trait SessionContext {
    /// Returns the stable identifier of the current session.
    fn session_id(&self) -> SessionId;

    /// Reads a configuration slot.
    fn get(&self, key: &str) -> Option<String>;

    /// Writes a configuration slot.
    fn put(&mut self, key: &str, value: String);
}
