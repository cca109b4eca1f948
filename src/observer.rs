//! Synchronous observer registration used for state-change notification.
//!
//! Components register interest in a state change and are notified
//! synchronously after each mutating operation. Registration hands back a
//! [`SubscriptionId`] so the observer can unregister when its own lifetime
//! ends.

use std::sync::Arc;

/// Handle identifying one registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// An ordered list of observers for events carrying a `T` payload.
pub struct Observers<T> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Arc<dyn Fn(&T) + Send + Sync>)>,
}

impl<T> Default for Observers<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T> Observers<T> {
    /// Creates an empty observer list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer and returns its subscription handle.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.subscribe_shared(Arc::new(observer))
    }

    /// Registers a shared observer callback.
    pub fn subscribe_shared(&mut self, observer: Arc<dyn Fn(&T) + Send + Sync>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    /// Removes the observer with the given handle.
    ///
    /// Returns `true` when the observer was present. Unsubscribing an
    /// already removed handle is a no-op.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        before != self.entries.len()
    }

    /// Notifies every registered observer, in registration order.
    pub fn notify(&self, payload: &T) {
        for (_, observer) in &self.entries {
            observer(payload);
        }
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no observers are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every registered observer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T> std::fmt::Debug for Observers<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.entries.len())
            .finish()
    }
}
