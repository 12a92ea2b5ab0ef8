// crates/cart-core/src/runtime/store.rs
// ============================================================================
// Module: Cart In-Memory Store
// Description: Simple in-memory record store for tests and examples.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides a simple in-memory implementation of [`RecordStore`]
//! for tests and local demos, plus a shared wrapper for trait objects. The
//! in-memory store enforces the same `(session_id, product_id, row_key)`
//! uniqueness as durable backends and performs upserts under a single lock.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::CollectionName;
use crate::core::LineItem;
use crate::core::LineItemId;
use crate::core::NewLineItem;
use crate::interfaces::LineItemPatch;
use crate::interfaces::RecordFilter;
use crate::interfaces::RecordStore;
use crate::interfaces::StoreError;
use crate::interfaces::UpsertOutcome;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Records of one collection keyed by identifier.
type CollectionRows = BTreeMap<LineItemId, LineItem>;

/// Mutable state behind the in-memory store lock.
#[derive(Debug, Default)]
struct MemoryState {
    /// Last identifier handed out (shared across collections).
    last_id: u64,
    /// Rows per collection.
    collections: BTreeMap<CollectionName, CollectionRows>,
}

impl MemoryState {
    /// Allocates the next record identifier.
    fn next_id(&mut self) -> Result<LineItemId, StoreError> {
        let next = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Store("record id space exhausted".to_string()))?;
        let id = LineItemId::from_raw(next)
            .ok_or_else(|| StoreError::Store("record id allocation failed".to_string()))?;
        self.last_id = next;
        Ok(id)
    }

    /// Stores a new record after checking identity uniqueness.
    fn insert(
        &mut self,
        collection: &CollectionName,
        item: NewLineItem,
    ) -> Result<LineItemId, StoreError> {
        let identity = identity_filter(&item);
        if self.rows(collection).is_some_and(|rows| rows.values().any(|row| identity.matches(row)))
        {
            return Err(StoreError::Store(format!(
                "unique constraint violated in collection {collection}"
            )));
        }
        let id = self.next_id()?;
        self.collections.entry(collection.clone()).or_default().insert(id, item.with_id(id));
        Ok(id)
    }

    /// Returns the rows of a collection when it exists.
    fn rows(&self, collection: &CollectionName) -> Option<&CollectionRows> {
        self.collections.get(collection)
    }
}

/// In-memory record store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRecordStore {
    /// Store state protected by a mutex.
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryRecordStore {
    /// Creates a new, empty in-memory record store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the store state.
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Store("record store mutex poisoned".to_string()))
    }
}

impl RecordStore for InMemoryRecordStore {
    fn select(
        &self,
        collection: &CollectionName,
        filter: &RecordFilter,
    ) -> Result<Vec<LineItem>, StoreError> {
        let guard = self.lock()?;
        Ok(guard
            .rows(collection)
            .map(|rows| rows.values().filter(|row| filter.matches(row)).cloned().collect())
            .unwrap_or_default())
    }

    fn insert(
        &self,
        collection: &CollectionName,
        item: NewLineItem,
    ) -> Result<LineItemId, StoreError> {
        self.lock()?.insert(collection, item)
    }

    fn update(
        &self,
        collection: &CollectionName,
        filter: &RecordFilter,
        patch: &LineItemPatch,
    ) -> Result<u64, StoreError> {
        let mut guard = self.lock()?;
        let Some(rows) = guard.collections.get_mut(collection) else {
            return Ok(0);
        };
        let mut patched: Vec<LineItem> = rows
            .values()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect();
        for row in &mut patched {
            patch.apply(row);
        }
        for row in &patched {
            let identity = RecordFilter::session(&row.session_id)
                .with_product(&row.product_id)
                .with_row_key(&row.row_key);
            let clashes = rows.values().any(|other| {
                other.id != row.id
                    && identity.matches(other)
                    && !patched.iter().any(|candidate| candidate.id == other.id)
            }) || patched.iter().any(|other| other.id != row.id && identity.matches(other));
            if clashes {
                return Err(StoreError::Store(format!(
                    "unique constraint violated in collection {collection}"
                )));
            }
        }
        let touched = patched.len();
        for row in patched {
            rows.insert(row.id, row);
        }
        drop(guard);
        u64::try_from(touched).map_err(|_| StoreError::Store("update count overflow".to_string()))
    }

    fn delete(
        &self,
        collection: &CollectionName,
        filter: &RecordFilter,
    ) -> Result<u64, StoreError> {
        let mut guard = self.lock()?;
        let Some(rows) = guard.collections.get_mut(collection) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|_, row| !filter.matches(row));
        let removed = before - rows.len();
        drop(guard);
        u64::try_from(removed).map_err(|_| StoreError::Store("delete count overflow".to_string()))
    }

    fn upsert(
        &self,
        collection: &CollectionName,
        item: NewLineItem,
        merge: &LineItemPatch,
    ) -> Result<UpsertOutcome, StoreError> {
        let mut guard = self.lock()?;
        let identity = identity_filter(&item);
        let existing = guard
            .collections
            .get_mut(collection)
            .and_then(|rows| rows.values_mut().find(|row| identity.matches(row)));
        if let Some(row) = existing {
            merge.apply(row);
            return Ok(UpsertOutcome::Merged(row.id));
        }
        guard.insert(collection, item).map(UpsertOutcome::Created)
    }
}

/// Builds the uniqueness filter for a new record.
fn identity_filter(item: &NewLineItem) -> RecordFilter {
    RecordFilter::session(&item.session_id)
        .with_product(&item.product_id)
        .with_row_key(&item.row_key)
}

// ============================================================================
// SECTION: Shared Store Wrapper
// ============================================================================

/// Shared record store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedRecordStore {
    /// Inner store implementation.
    inner: Arc<dyn RecordStore + Send + Sync>,
}

impl SharedRecordStore {
    /// Wraps a record store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl RecordStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }
}

impl RecordStore for SharedRecordStore {
    fn select(
        &self,
        collection: &CollectionName,
        filter: &RecordFilter,
    ) -> Result<Vec<LineItem>, StoreError> {
        self.inner.select(collection, filter)
    }

    fn insert(
        &self,
        collection: &CollectionName,
        item: NewLineItem,
    ) -> Result<LineItemId, StoreError> {
        self.inner.insert(collection, item)
    }

    fn update(
        &self,
        collection: &CollectionName,
        filter: &RecordFilter,
        patch: &LineItemPatch,
    ) -> Result<u64, StoreError> {
        self.inner.update(collection, filter, patch)
    }

    fn delete(
        &self,
        collection: &CollectionName,
        filter: &RecordFilter,
    ) -> Result<u64, StoreError> {
        self.inner.delete(collection, filter)
    }

    fn upsert(
        &self,
        collection: &CollectionName,
        item: NewLineItem,
        merge: &LineItemPatch,
    ) -> Result<UpsertOutcome, StoreError> {
        self.inner.upsert(collection, item, merge)
    }
}
