//! The entity store: single source of truth for business collections.
//!
//! Every mutation follows the same sequence under an async write gate:
//! validate, persist through the [`PersistenceAdapter`], apply to memory,
//! release the gate, notify listeners. A failure at any step before the
//! memory update leaves the store exactly as it was.

mod party;
mod registry;
mod state;

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use self::registry::ListenerRegistry;
use self::state::{StoreState, Stored};
use crate::domain::{AccountOwner, Collection, Entity, LinkedAccount};
use crate::error::Result;
use crate::port::{Listener, ListenerId, PersistenceAdapter, Record};

/// Owns the in-memory collections and mediates all writes to persistence.
///
/// Construct once per process with [`EntityStore::open`] and share it through
/// [`AppContext`](crate::application::AppContext). Views read snapshots and
/// mutate only through the store's operations.
pub struct EntityStore {
    adapter: Arc<dyn PersistenceAdapter>,
    state: RwLock<StoreState>,
    write_gate: Mutex<()>,
    listeners: ListenerRegistry,
}

impl EntityStore {
    /// Open the store, hydrating every collection from `adapter`.
    ///
    /// # Errors
    /// Returns a persistence error if any collection cannot be loaded or
    /// decoded.
    pub async fn open(adapter: Arc<dyn PersistenceAdapter>) -> Result<Self> {
        let mut state = StoreState::default();
        for collection in Collection::ALL {
            let records = adapter.load(collection).await?;
            let count = records.len();
            match collection {
                Collection::Suppliers => hydrate::<crate::domain::Supplier>(&mut state, &records)?,
                Collection::Customers => hydrate::<crate::domain::Customer>(&mut state, &records)?,
                Collection::Accounts => hydrate::<LinkedAccount>(&mut state, &records)?,
            }
            debug!(%collection, count, "Hydrated collection");
        }

        info!(backend = adapter.name(), "Entity store opened");
        Ok(Self {
            adapter,
            state: RwLock::new(state),
            write_gate: Mutex::new(()),
            listeners: ListenerRegistry::default(),
        })
    }

    /// Label of the persistence backend in use.
    #[must_use]
    pub fn backend(&self) -> &'static str {
        self.adapter.name()
    }

    /// Subscribe to change notifications.
    pub fn add_listener(&self, listener: Arc<dyn Listener>) -> ListenerId {
        let id = self.listeners.add(listener);
        debug!(listener = %id, "Listener added");
        id
    }

    /// Unsubscribe. Returns `false` if `id` was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let removed = self.listeners.remove(id);
        debug!(listener = %id, removed, "Listener removed");
        removed
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Snapshot of all linked accounts, in insertion order.
    #[must_use]
    pub fn accounts(&self) -> Vec<LinkedAccount> {
        self.snapshot()
    }

    /// The account owned by `owner`, if any.
    #[must_use]
    pub fn account_for(&self, owner: &AccountOwner) -> Option<LinkedAccount> {
        self.state.read().account_of(owner).cloned()
    }

    fn snapshot<E: Stored>(&self) -> Vec<E> {
        self.state.read().all::<E>().to_vec()
    }

    fn lookup<E: Stored>(&self, key: &str) -> Option<E> {
        self.state.read().find::<E>(key).cloned()
    }

    async fn persist<E: Entity>(&self, entity: &E) -> Result<()> {
        let record = Record::encode(entity)?;
        self.adapter.put(E::COLLECTION, &record).await?;
        Ok(())
    }

    async fn unpersist<E: Entity>(&self, key: &str) -> Result<bool> {
        Ok(self.adapter.remove(E::COLLECTION, key).await?)
    }

    /// Undo a write whose sibling write failed. Failure here is logged; the
    /// caller already returns the original error.
    async fn compensate_put<E: Entity>(&self, entity: &E) {
        if let Err(err) = self.persist(entity).await {
            warn!(
                collection = %E::COLLECTION,
                id = entity.key(),
                error = %err,
                "Compensating write failed, backend may diverge from memory"
            );
        }
    }

    async fn compensate_remove<E: Entity>(&self, key: &str) {
        if let Err(err) = self.unpersist::<E>(key).await {
            warn!(
                collection = %E::COLLECTION,
                id = key,
                error = %err,
                "Compensating removal failed, backend may diverge from memory"
            );
        }
    }

    fn notify(&self) {
        let delivered = self.listeners.notify_all();
        debug!(delivered, "Listeners notified");
    }
}

fn hydrate<E: Stored>(state: &mut StoreState, records: &[Record]) -> Result<()> {
    for record in records {
        state.upsert(record.decode::<E>()?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewSupplier, Party, Supplier};
    use crate::testkit::memory::MemoryAdapter;
    use chrono::Utc;

    #[tokio::test]
    async fn open_hydrates_from_backend() {
        let adapter = Arc::new(MemoryAdapter::new());
        let supplier = Supplier::create(NewSupplier::new("ACME"), Utc::now()).unwrap();
        adapter
            .put(Collection::Suppliers, &Record::encode(&supplier).unwrap())
            .await
            .unwrap();

        let store = EntityStore::open(adapter).await.unwrap();
        assert_eq!(store.suppliers(), vec![supplier]);
        assert_eq!(store.backend(), "memory");
    }

    #[tokio::test]
    async fn open_fails_when_backend_is_down() {
        let adapter = Arc::new(MemoryAdapter::new());
        adapter.set_unavailable(true);
        assert!(EntityStore::open(adapter).await.is_err());
    }

    #[tokio::test]
    async fn open_rejects_corrupt_records() {
        let adapter = Arc::new(MemoryAdapter::new());
        adapter
            .put(
                Collection::Customers,
                &Record {
                    id: "c1".into(),
                    body: serde_json::json!({"id": "c1"}),
                },
            )
            .await
            .unwrap();
        assert!(EntityStore::open(adapter).await.is_err());
    }
}
