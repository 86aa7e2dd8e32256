//! Change notifications.
//!
//! Slots run directly on the emitting thread, in connection order. The
//! engine never queues notifications.
//!
//! # Example
//!
//! ```
//! use horizon_tabular_core::Signal;
//!
//! let page_changed = Signal::<usize>::new();
//! let id = page_changed.connect(|page| println!("now on page {page}"));
//!
//! page_changed.emit(2);
//! {
//!     let _quiet = page_changed.block();
//!     page_changed.emit(3); // not delivered
//! }
//! page_changed.disconnect(id);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// Identifies one connected slot; pass it to [`Signal::disconnect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

struct Connections<Args> {
    slots: SlotMap<ConnectionId, Slot<Args>>,
    /// Number of live [`BlockGuard`]s.
    blockers: usize,
}

/// A notification that any number of slots can subscribe to.
pub struct Signal<Args> {
    state: Mutex<Connections<Args>>,
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> Signal<Args> {
    /// Creates a signal with no slots.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(Connections {
                slots: SlotMap::with_key(),
                blockers: 0,
            }),
        }
    }

    /// Subscribes `slot`.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.state.lock().slots.insert(Arc::new(slot))
    }

    /// Unsubscribes one slot. Returns `false` if it was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.state.lock().slots.remove(id).is_some()
    }

    /// Unsubscribes every slot.
    pub fn disconnect_all(&self) {
        self.state.lock().slots.clear();
    }

    /// Number of subscribed slots.
    pub fn connection_count(&self) -> usize {
        self.state.lock().slots.len()
    }

    /// Suppresses emission until the returned guard is dropped.
    ///
    /// Guards nest; emission resumes when the last one is dropped.
    #[must_use = "emission resumes as soon as the guard is dropped"]
    pub fn block(&self) -> BlockGuard<'_, Args> {
        self.state.lock().blockers += 1;
        BlockGuard { signal: self }
    }

    /// Returns `true` while a [`BlockGuard`] is alive.
    pub fn is_blocked(&self) -> bool {
        self.state.lock().blockers > 0
    }

    /// Delivers `args` to every slot.
    ///
    /// The lock is released before slots run, so a slot may connect or
    /// disconnect on this same signal.
    pub fn emit(&self, args: Args) {
        let slots: Vec<Slot<Args>> = {
            let state = self.state.lock();
            if state.blockers > 0 {
                tracing::trace!(target: targets::SIGNAL, "emit suppressed");
                return;
            }
            state.slots.values().cloned().collect()
        };

        tracing::trace!(target: targets::SIGNAL, slots = slots.len(), "emit");
        for slot in &slots {
            slot(&args);
        }
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Signal")
            .field("slots", &state.slots.len())
            .field("blockers", &state.blockers)
            .finish()
    }
}

/// Keeps a [`Signal`] blocked while alive.
pub struct BlockGuard<'a, Args> {
    signal: &'a Signal<Args>,
}

impl<Args> Drop for BlockGuard<'_, Args> {
    fn drop(&mut self) {
        let mut state = self.signal.state.lock();
        state.blockers = state.blockers.saturating_sub(1);
    }
}
