//! Listener registry (observer list) for store notifications.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use crate::port::{Listener, ListenerId};

/// Registered listeners in registration order.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(ListenerId, Arc<dyn Listener>)>>,
}

impl ListenerRegistry {
    pub(crate) fn add(&self, listener: Arc<dyn Listener>) -> ListenerId {
        let id = ListenerId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, listener));
        id
    }

    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(registered, _)| *registered != id);
        listeners.len() < before
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Invoke every listener once. Returns how many completed without panicking.
    ///
    /// The list is snapshotted first, so listeners may register or remove
    /// listeners while being notified.
    pub(crate) fn notify_all(&self) -> usize {
        let snapshot: Vec<_> = self.listeners.lock().clone();
        let mut delivered = 0;
        for (id, listener) in snapshot {
            match catch_unwind(AssertUnwindSafe(|| listener.on_change())) {
                Ok(()) => delivered += 1,
                Err(_) => warn!(listener = %id, "Listener panicked during notification"),
            }
        }
        delivered
    }
}
