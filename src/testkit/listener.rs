//! Listener that counts notifications.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::port::Listener;

/// Thread-safe notification counter for tests.
#[derive(Clone, Default)]
pub struct CountingListener {
    calls: Arc<AtomicUsize>,
}

impl CountingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Listener for CountingListener {
    fn on_change(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}
