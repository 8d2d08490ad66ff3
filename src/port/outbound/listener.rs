//! Listener port for store change notifications.
//!
//! Notifications carry no payload: a listener re-reads whatever part of the
//! store it renders.

use std::fmt;

/// Handle returned on registration, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// Receiver of store change notifications.
///
/// # Implementation Notes
///
/// - Called synchronously after a mutation has been committed
/// - Must not block; spawn a task for slow work
/// - A panic is caught and logged by the store and does not undo the change
pub trait Listener: Send + Sync {
    fn on_change(&self);
}

impl<F> Listener for F
where
    F: Fn() + Send + Sync,
{
    fn on_change(&self) {
        self();
    }
}
