//! In-memory persistence backend with failure injection.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::Collection;
use crate::error::PersistenceError;
use crate::port::{PersistenceAdapter, Record};

/// Insertion-ordered record store kept in memory.
///
/// Switches simulate an unreachable backend, a backend that rejects every
/// request, or write failures scoped to one collection.
#[derive(Default)]
pub struct MemoryAdapter {
    collections: Mutex<HashMap<Collection, Vec<Record>>>,
    unavailable: AtomicBool,
    rejecting: AtomicBool,
    failing: Mutex<HashSet<Collection>>,
    writes: AtomicUsize,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every request fail with [`PersistenceError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make every request fail with [`PersistenceError::Rejected`].
    pub fn set_rejecting(&self, rejecting: bool) {
        self.rejecting.store(rejecting, Ordering::SeqCst);
    }

    /// Make writes to `collection` fail with [`PersistenceError::Database`].
    pub fn fail_writes_to(&self, collection: Collection, failing: bool) {
        let mut set = self.failing.lock();
        if failing {
            set.insert(collection);
        } else {
            set.remove(&collection);
        }
    }

    /// Ids stored in `collection`, in insertion order.
    pub fn ids(&self, collection: Collection) -> Vec<String> {
        self.collections
            .lock()
            .get(&collection)
            .map(|records| records.iter().map(|r| r.id.clone()).collect())
            .unwrap_or_default()
    }

    pub fn get(&self, collection: Collection, id: &str) -> Option<Record> {
        self.collections
            .lock()
            .get(&collection)
            .and_then(|records| records.iter().find(|r| r.id == id).cloned())
    }

    /// Successful put/remove calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), PersistenceError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable("memory backend offline".into()));
        }
        if self.rejecting.load(Ordering::SeqCst) {
            return Err(PersistenceError::Rejected {
                status: 403,
                body: "memory backend rejecting".into(),
            });
        }
        Ok(())
    }

    fn check_write(&self, collection: Collection) -> Result<(), PersistenceError> {
        self.check()?;
        if self.failing.lock().contains(&collection) {
            return Err(PersistenceError::Database(format!(
                "writes to {collection} disabled"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PersistenceAdapter for MemoryAdapter {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn load(&self, collection: Collection) -> Result<Vec<Record>, PersistenceError> {
        self.check()?;
        Ok(self
            .collections
            .lock()
            .get(&collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn put(&self, collection: Collection, record: &Record) -> Result<(), PersistenceError> {
        self.check_write(collection)?;
        let mut collections = self.collections.lock();
        let records = collections.entry(collection).or_default();
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => existing.body = record.body.clone(),
            None => records.push(record.clone()),
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, collection: Collection, id: &str) -> Result<bool, PersistenceError> {
        self.check_write(collection)?;
        let mut collections = self.collections.lock();
        let records = collections.entry(collection).or_default();
        let before = records.len();
        records.retain(|r| r.id != id);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(records.len() < before)
    }
}
