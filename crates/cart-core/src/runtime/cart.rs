// crates/cart-core/src/runtime/cart.rs
// ============================================================================
// Module: Cart Store Runtime
// Description: Session-scoped insert, update, removal, and totals for cart rows.
// Purpose: Apply input sanitation and merge rules on top of a record store.
// Dependencies: crate::{core, interfaces}, bigdecimal, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`CartStore`] binds a record store to one session and one collection and
//! exposes the cart operations over them. Every write normalizes its input
//! first; nothing reaches the store unless quantity, price, product id, and
//! name all pass their rules.
//!
//! Inserting a product + options combination that the session already holds
//! overwrites quantity, price, and name on the existing row instead of adding
//! to it. The lookup and the write happen in one [`RecordStore::upsert`] call
//! so stores with conditional writes can make the merge atomic.
//!
//! Updates address rows by row key alone and are not confined to the bound
//! session. Removals and reads are always confined to it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use bigdecimal::BigDecimal;
use thiserror::Error;
use tracing::debug;
use tracing::warn;

use crate::core::CartItemInput;
use crate::core::CollectionName;
use crate::core::CustomerId;
use crate::core::InputRejection;
use crate::core::InvalidCollectionName;
use crate::core::ItemName;
use crate::core::LineItem;
use crate::core::LineItemId;
use crate::core::NewLineItem;
use crate::core::OptionsError;
use crate::core::Price;
use crate::core::ProductId;
use crate::core::Quantity;
use crate::core::RowKey;
use crate::core::SessionId;
use crate::core::encode_options;
use crate::core::row_key;
use crate::interfaces::COLLECTION_CONFIG_KEY;
use crate::interfaces::LineItemPatch;
use crate::interfaces::RecordFilter;
use crate::interfaces::RecordStore;
use crate::interfaces::SessionContext;
use crate::interfaces::StoreError;
use crate::interfaces::UpsertOutcome;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Cart operation errors.
///
/// # Invariants
/// - Validation variants never leave a partial write behind.
/// - Store failures are surfaced as [`CartError::Storage`], never swallowed.
#[derive(Debug, Error)]
pub enum CartError {
    /// Payload was empty or a required field was absent or empty.
    #[error("cart input missing: {0}")]
    InputMissing(&'static str),
    /// A supplied field failed normalization or validation.
    #[error("cart input invalid: {0}")]
    InputInvalid(#[from] InputRejection),
    /// Update payload produced no field to write.
    #[error("cart update carries no applicable fields")]
    NoEffectivePatch,
    /// Option values could not be encoded for storage.
    #[error("cart options invalid: {0}")]
    Options(#[from] OptionsError),
    /// Session configured an unusable collection name.
    #[error("cart collection invalid: {0}")]
    InvalidCollection(#[from] InvalidCollectionName),
    /// Aggregated quantity exceeded the counter range.
    #[error("cart item count overflow")]
    CountOverflow,
    /// Backing store failed.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl CartError {
    /// Returns true for rejections caused by caller input rather than the store.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InputMissing(_)
                | Self::InputInvalid(_)
                | Self::NoEffectivePatch
                | Self::Options(_)
                | Self::InvalidCollection(_)
        )
    }
}

// ============================================================================
// SECTION: Cart Store
// ============================================================================

/// Cart operations bound to one session and one collection.
///
/// # Invariants
/// - Every read, insert, and removal is filtered by the bound session.
/// - The collection is read from this value at call time; changing it with
///   [`CartStore::set_collection`] redirects all later operations.
#[derive(Debug, Clone)]
pub struct CartStore<S> {
    /// Backing record store.
    store: S,
    /// Session owning the cart rows.
    session_id: SessionId,
    /// Active collection name.
    collection: CollectionName,
}

impl<S: RecordStore> CartStore<S> {
    /// Creates a cart bound to an explicit session and collection.
    #[must_use]
    pub const fn new(store: S, session_id: SessionId, collection: CollectionName) -> Self {
        Self {
            store,
            session_id,
            collection,
        }
    }

    /// Creates a cart from a session context.
    ///
    /// The collection is read from [`COLLECTION_CONFIG_KEY`]; an unset slot
    /// falls back to [`CollectionName::default`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InputMissing`] when the session id is empty and
    /// [`CartError::InvalidCollection`] when the slot holds an unusable name.
    pub fn from_context(store: S, context: &dyn SessionContext) -> Result<Self, CartError> {
        let session_id = context.session_id();
        if session_id.as_str().is_empty() {
            return Err(CartError::InputMissing("session_id"));
        }
        let collection = match context.get(COLLECTION_CONFIG_KEY) {
            Some(name) => CollectionName::parse(&name)?,
            None => CollectionName::default(),
        };
        Ok(Self::new(store, session_id, collection))
    }

    /// Returns the bound session.
    #[must_use]
    pub const fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Returns the active collection name.
    #[must_use]
    pub const fn collection(&self) -> &CollectionName {
        &self.collection
    }

    /// Redirects all later operations to another collection.
    pub fn set_collection(&mut self, collection: CollectionName) {
        debug!(
            target: "cart::store",
            session = %self.session_id,
            from = %self.collection,
            to = %collection,
            "cart collection redirected"
        );
        self.collection = collection;
    }

    /// Returns the backing record store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Adds a line item, or overwrites the session's existing row for the
    /// same product + options.
    ///
    /// On merge only quantity, price, and name change; customer and options
    /// keep their first-written values. Returns the identifier of the
    /// created or merged row.
    ///
    /// # Errors
    ///
    /// Returns a validation [`CartError`] when the payload is empty, a
    /// required field is missing, or any field fails its rule, and
    /// [`CartError::Storage`] when the store fails.
    pub fn insert(
        &self,
        input: &CartItemInput,
        customer_id: CustomerId,
    ) -> Result<LineItemId, CartError> {
        let item = self.prepare_insert(input, customer_id).inspect_err(|err| {
            warn!(
                target: "cart::store",
                session = %self.session_id,
                reason = %err,
                "cart insert rejected"
            );
        })?;
        let merge = LineItemPatch::merge_from(&item);
        let row_key = item.row_key.clone();
        let outcome = self.store.upsert(&self.collection, item, &merge)?;
        match outcome {
            UpsertOutcome::Created(id) => debug!(
                target: "cart::store",
                session = %self.session_id,
                collection = %self.collection,
                row_key = %row_key,
                id = %id,
                "cart line item created"
            ),
            UpsertOutcome::Merged(id) => debug!(
                target: "cart::store",
                session = %self.session_id,
                collection = %self.collection,
                row_key = %row_key,
                id = %id,
                "cart line item merged"
            ),
        }
        Ok(outcome.id())
    }

    /// Applies the non-empty fields of `input` to every row holding `row_key`.
    ///
    /// A field holding exactly `"0"` counts as empty and is skipped, so the
    /// remaining fields are still applied.
    /// The customer association is written only when `customer_id` is set.
    /// Rows are matched by row key alone; the bound session does not narrow
    /// the match.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InputMissing`] for an empty payload,
    /// [`CartError::NoEffectivePatch`] when no field survives,
    /// [`CartError::InputInvalid`] when a supplied field fails its rule, and
    /// [`CartError::Storage`] when the store fails.
    pub fn update(
        &self,
        input: &CartItemInput,
        row_key: &RowKey,
        customer_id: CustomerId,
    ) -> Result<(), CartError> {
        let patch = build_patch(input, customer_id).inspect_err(|err| {
            warn!(
                target: "cart::store",
                session = %self.session_id,
                row_key = %row_key,
                reason = %err,
                "cart update rejected"
            );
        })?;
        let filter = RecordFilter::all().with_row_key(row_key);
        let touched = self.store.update(&self.collection, &filter, &patch)?;
        debug!(
            target: "cart::store",
            session = %self.session_id,
            collection = %self.collection,
            row_key = %row_key,
            touched,
            "cart line item updated"
        );
        Ok(())
    }

    /// Removes the session's row holding `row_key`. Missing rows are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] when the store fails.
    pub fn remove_item(&self, row_key: &RowKey) -> Result<(), CartError> {
        let filter = RecordFilter::session(&self.session_id).with_row_key(row_key);
        let removed = self.store.delete(&self.collection, &filter)?;
        debug!(
            target: "cart::store",
            session = %self.session_id,
            row_key = %row_key,
            removed,
            "cart line item removed"
        );
        Ok(())
    }

    /// Removes every row of the bound session.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] when the store fails.
    pub fn remove_all_items(&self) -> Result<(), CartError> {
        let removed =
            self.store.delete(&self.collection, &RecordFilter::session(&self.session_id))?;
        debug!(target: "cart::store", session = %self.session_id, removed, "cart cleared");
        Ok(())
    }

    /// Returns every row of the bound session, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] when the store fails.
    pub fn items(&self) -> Result<Vec<LineItem>, CartError> {
        Ok(self.store.select(&self.collection, &RecordFilter::session(&self.session_id))?)
    }

    /// Returns the sum of quantities across the session's rows.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] when the store fails and
    /// [`CartError::CountOverflow`] when the sum exceeds `u64`.
    pub fn total_items(&self) -> Result<u64, CartError> {
        self.items()?.iter().try_fold(0_u64, |total, item| {
            total.checked_add(item.quantity.get()).ok_or(CartError::CountOverflow)
        })
    }

    /// Returns the sum of `price * quantity` across the session's rows.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] when the store fails.
    pub fn total_amount(&self) -> Result<BigDecimal, CartError> {
        Ok(self
            .items()?
            .iter()
            .fold(BigDecimal::from(0), |total, item| total + item.line_total()))
    }

    /// Validates an insert payload into a storable record.
    fn prepare_insert(
        &self,
        input: &CartItemInput,
        customer_id: CustomerId,
    ) -> Result<NewLineItem, CartError> {
        if input.is_empty() {
            return Err(CartError::InputMissing("payload"));
        }
        let product_id = required(input.product_id.as_deref(), "product_id")?;
        let quantity = required(input.quantity.as_deref(), "quantity")?;
        let price = required(input.price.as_deref(), "price")?;
        let name = required(input.name.as_deref(), "name")?;

        let quantity = Quantity::normalize(quantity)?;
        let price = Price::normalize(price)?;
        let product_id = ProductId::parse(product_id)?;
        let name = ItemName::parse(name)?;

        Ok(NewLineItem {
            row_key: row_key(&product_id, &input.options),
            session_id: self.session_id.clone(),
            product_id,
            customer_id,
            quantity,
            price,
            name,
            options: encode_options(&input.options)?,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the sparse update patch from the non-empty payload fields.
fn build_patch(input: &CartItemInput, customer_id: CustomerId) -> Result<LineItemPatch, CartError> {
    if input.is_empty() {
        return Err(CartError::InputMissing("payload"));
    }
    let mut patch = LineItemPatch::default();
    if let Some(quantity) = supplied(input.quantity.as_deref()) {
        patch.quantity = Some(Quantity::normalize(quantity)?);
    }
    if customer_id.is_set() {
        patch.customer_id = Some(customer_id);
    }
    if let Some(product_id) = supplied(input.product_id.as_deref()) {
        patch.product_id = Some(ProductId::parse(product_id)?);
    }
    if let Some(name) = supplied(input.name.as_deref()) {
        patch.name = Some(ItemName::parse(name)?);
    }
    if let Some(price) = supplied(input.price.as_deref()) {
        patch.price = Some(Price::normalize(price)?);
    }
    if !input.options.is_empty() {
        patch.options = Some(encode_options(&input.options)?);
    }
    if patch.is_empty() {
        return Err(CartError::NoEffectivePatch);
    }
    Ok(patch)
}

/// Returns the value when present and non-empty.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

/// Returns the update value unless it is empty or exactly `"0"`.
fn supplied(value: Option<&str>) -> Option<&str> {
    present(value).filter(|text| *text != "0")
}

/// Requires a present, non-empty field.
fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, CartError> {
    present(value).ok_or(CartError::InputMissing(field))
}
