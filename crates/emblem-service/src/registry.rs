//! Connection-to-context binding registry.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use emblem_core::context::BindingContext;
use emblem_core::ids::ConnectionId;

/// One-to-one record of which execution context each live connection was
/// admitted with.
///
/// Exclusively owned by the service task; every mutation is serialized there,
/// so a plain map suffices. Entries are removed when the connection closes,
/// so no orphaned entries persist.
#[derive(Debug, Default)]
pub struct BindingRegistry {
    bindings: HashMap<ConnectionId, BindingContext>,
}

impl BindingRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind a context to a fresh connection id.
    ///
    /// # Panics
    ///
    /// Panics if the id is already bound, leaving the existing binding
    /// untouched. Connection ids are unique for their lifetime; a duplicate
    /// means the connection source is broken, not a runtime condition to
    /// recover from.
    pub fn register(&mut self, id: ConnectionId, context: BindingContext) {
        match self.bindings.entry(id) {
            Entry::Vacant(slot) => {
                let _ = slot.insert(context);
            }
            Entry::Occupied(existing) => {
                panic!(
                    "connection {} is already bound to {}",
                    existing.key(),
                    existing.get()
                );
            }
        }
    }

    /// Look up the context bound to a connection.
    ///
    /// `None` means the id is unknown — already closed, or forged. Callers
    /// drop the request silently; an unknown id is never reported back to
    /// the requester.
    pub fn resolve(&self, id: &ConnectionId) -> Option<&BindingContext> {
        self.bindings.get(id)
    }

    /// Remove a binding, returning whether one existed.
    ///
    /// Idempotent: close notifications can race with explicit cleanup, so
    /// removing an absent id is a no-op.
    pub fn unregister(&mut self, id: &ConnectionId) -> bool {
        self.bindings.remove(id).is_some()
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no connections are bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
