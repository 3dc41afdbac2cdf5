//! Change notifications
//!
//! Stores announce mutations on a broadcast feed; the planner refetches and
//! re-renders on events that touch its active window. Dropping a receiver
//! is the unsubscription.

use rap_model::WeekWindow;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// A change announcement from a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreEvent {
    /// Allocation rows changed for a window (created, patched, or deleted)
    AllocationsChanged {
        /// The window whose rows changed
        window: WeekWindow,
    },
    /// Project or client records changed
    DirectoryChanged,
}

impl StoreEvent {
    /// True when the event affects what a viewer of `window` sees
    #[inline]
    #[must_use]
    pub fn touches(&self, window: WeekWindow) -> bool {
        match self {
            StoreEvent::AllocationsChanged { window: changed } => *changed == window,
            StoreEvent::DirectoryChanged => true,
        }
    }
}

/// Shared broadcast feed the in-memory stores publish on
///
/// Cloning shares the underlying channel, so one feed can serve several
/// stores and any number of subscribers.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<StoreEvent>,
}

impl ChangeFeed {
    /// Create a feed with the given buffer capacity
    #[inline]
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event; lagging or absent subscribers are not an error
    #[inline]
    pub fn emit(&self, event: StoreEvent) {
        let _ = self.tx.send(event);
    }

    /// Open a new subscription
    #[inline]
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(64)
    }
}
