// crates/cart-core/src/runtime/session.rs
// ============================================================================
// Module: Cart In-Memory Session
// Description: Map-backed session context for tests and embedded hosts.
// Purpose: Supply session identity and configuration slots without a web stack.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Hosts with a real session layer implement [`SessionContext`] over it. This
//! module offers a plain map-backed implementation, plus the helper that
//! seeds the collection slot when a session is established.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::CollectionName;
use crate::core::SessionId;
use crate::interfaces::COLLECTION_CONFIG_KEY;
use crate::interfaces::SessionContext;

// ============================================================================
// SECTION: In-Memory Session
// ============================================================================

/// Session context holding its slots in a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemorySessionContext {
    /// Session identity.
    session_id: SessionId,
    /// Configuration slots.
    slots: BTreeMap<String, String>,
}

impl InMemorySessionContext {
    /// Creates a context for the given session with no slots set.
    #[must_use]
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            slots: BTreeMap::new(),
        }
    }
}

impl SessionContext for InMemorySessionContext {
    fn session_id(&self) -> SessionId {
        self.session_id.clone()
    }

    fn get(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: String) {
        self.slots.insert(key.to_string(), value);
    }
}

// ============================================================================
// SECTION: Session Setup
// ============================================================================

/// Writes the collection name into the session's collection slot.
///
/// Called once when a session is established, with
/// [`CollectionName::default`] unless the host redirects cart storage.
pub fn establish_session(context: &mut dyn SessionContext, collection: &CollectionName) {
    context.put(COLLECTION_CONFIG_KEY, collection.as_str().to_string());
}
