//! Remote-primary persistence with a local mirror.
//!
//! Writes go to the remote store and are copied into the local one. While
//! the remote is unavailable, reads and writes are served locally and the
//! writes are queued; the queue is replayed in order before the next remote
//! operation. Rejections from the remote are surfaced, never masked.
//!
//! A successful remote load makes the local copy of that collection match
//! the remote, except for records with writes still queued.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::Collection;
use crate::error::PersistenceError;
use crate::port::{PersistenceAdapter, Record};

/// A write made locally while the remote was unreachable.
#[derive(Debug, Clone)]
enum PendingOp {
    Put(Collection, Record),
    Remove(Collection, String),
}

pub struct MirroredAdapter {
    remote: Arc<dyn PersistenceAdapter>,
    local: Arc<dyn PersistenceAdapter>,
    pending: Mutex<VecDeque<PendingOp>>,
}

impl MirroredAdapter {
    #[must_use]
    pub fn new(remote: Arc<dyn PersistenceAdapter>, local: Arc<dyn PersistenceAdapter>) -> Self {
        Self {
            remote,
            local,
            pending: Mutex::new(VecDeque::new()),
        }
    }

    /// Number of local-only writes waiting for the remote.
    pub async fn pending_len(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Replay queued writes against the remote, oldest first.
    ///
    /// Stops at the first unavailable error. Returns whether the queue is
    /// now empty.
    pub async fn flush_pending(&self) -> bool {
        let mut pending = self.pending.lock().await;
        let queued = pending.len();

        while let Some(op) = pending.front().cloned() {
            let result = match &op {
                PendingOp::Put(collection, record) => self.remote.put(*collection, record).await,
                PendingOp::Remove(collection, id) => {
                    self.remote.remove(*collection, id).await.map(|_| ())
                }
            };
            match result {
                Ok(()) => {
                    pending.pop_front();
                }
                Err(err) if err.is_unavailable() => break,
                Err(err) => {
                    warn!(error = %err, op = ?op, "Remote rejected queued write, dropping it");
                    pending.pop_front();
                }
            }
        }

        if queued > 0 && pending.is_empty() {
            info!(replayed = queued, "Replayed local writes to remote");
        }
        pending.is_empty()
    }

    async fn enqueue(&self, op: PendingOp) {
        self.pending.lock().await.push_back(op);
    }

    fn queued_ids(pending: &VecDeque<PendingOp>, collection: Collection) -> HashSet<String> {
        pending
            .iter()
            .filter_map(|op| match op {
                PendingOp::Put(c, record) if *c == collection => Some(record.id.clone()),
                PendingOp::Remove(c, id) if *c == collection => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    /// Copy a fresh remote listing into the local mirror and drop local
    /// records the remote no longer has.
    async fn refresh_mirror(&self, collection: Collection, records: &[Record]) {
        for record in records {
            self.mirror_put(collection, record).await;
        }

        let local = match self.local.load(collection).await {
            Ok(local) => local,
            Err(err) => {
                warn!(%collection, error = %err, "Failed to read local mirror for pruning");
                return;
            }
        };
        let remote_ids: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
        let queued = Self::queued_ids(&*self.pending.lock().await, collection);

        for stale in local
            .iter()
            .filter(|r| !remote_ids.contains(r.id.as_str()) && !queued.contains(&r.id))
        {
            match self.local.remove(collection, &stale.id).await {
                Ok(_) => debug!(%collection, id = %stale.id, "Pruned record missing from remote"),
                Err(err) => {
                    warn!(%collection, id = %stale.id, error = %err, "Failed to prune mirrored record");
                }
            }
        }
    }

    async fn mirror_put(&self, collection: Collection, record: &Record) {
        if let Err(err) = self.local.put(collection, record).await {
            warn!(%collection, id = %record.id, error = %err, "Failed to mirror record locally");
        }
    }
}

#[async_trait]
impl PersistenceAdapter for MirroredAdapter {
    fn name(&self) -> &'static str {
        "mirrored"
    }

    async fn load(&self, collection: Collection) -> Result<Vec<Record>, PersistenceError> {
        if !self.flush_pending().await {
            warn!(%collection, "Remote behind local writes, loading from local mirror");
            return self.local.load(collection).await;
        }

        match self.remote.load(collection).await {
            Ok(records) => {
                self.refresh_mirror(collection, &records).await;
                Ok(records)
            }
            Err(err) if err.is_unavailable() => {
                warn!(%collection, error = %err, "Remote unavailable, loading from local mirror");
                self.local.load(collection).await
            }
            Err(err) => Err(err),
        }
    }

    async fn put(&self, collection: Collection, record: &Record) -> Result<(), PersistenceError> {
        let remote_result = if self.flush_pending().await {
            self.remote.put(collection, record).await
        } else {
            Err(PersistenceError::Unavailable("queued writes not yet replayed".into()))
        };

        match remote_result {
            Ok(()) => {
                self.mirror_put(collection, record).await;
                Ok(())
            }
            Err(err) if err.is_unavailable() => {
                warn!(%collection, id = %record.id, error = %err, "Remote unavailable, writing locally");
                self.local.put(collection, record).await?;
                self.enqueue(PendingOp::Put(collection, record.clone())).await;
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    async fn remove(&self, collection: Collection, id: &str) -> Result<bool, PersistenceError> {
        let remote_result = if self.flush_pending().await {
            self.remote.remove(collection, id).await
        } else {
            Err(PersistenceError::Unavailable("queued writes not yet replayed".into()))
        };

        match remote_result {
            Ok(existed) => {
                if let Err(err) = self.local.remove(collection, id).await {
                    warn!(%collection, id, error = %err, "Failed to remove mirrored record");
                }
                Ok(existed)
            }
            Err(err) if err.is_unavailable() => {
                warn!(%collection, id, error = %err, "Remote unavailable, removing locally");
                let existed = self.local.remove(collection, id).await?;
                self.enqueue(PendingOp::Remove(collection, id.to_string())).await;
                Ok(existed)
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::memory::MemoryAdapter;
    use serde_json::json;

    fn record(id: &str) -> Record {
        Record {
            id: id.into(),
            body: json!({ "id": id }),
        }
    }

    fn setup() -> (Arc<MemoryAdapter>, Arc<MemoryAdapter>, MirroredAdapter) {
        let remote = Arc::new(MemoryAdapter::new());
        let local = Arc::new(MemoryAdapter::new());
        let mirrored = MirroredAdapter::new(remote.clone(), local.clone());
        (remote, local, mirrored)
    }

    #[tokio::test]
    async fn writes_reach_both_backends() {
        let (remote, local, mirrored) = setup();
        mirrored.put(Collection::Suppliers, &record("a")).await.unwrap();

        assert_eq!(remote.ids(Collection::Suppliers), vec!["a"]);
        assert_eq!(local.ids(Collection::Suppliers), vec!["a"]);
    }

    #[tokio::test]
    async fn outage_falls_back_to_local_and_replays_later() {
        let (remote, local, mirrored) = setup();
        remote.set_unavailable(true);

        mirrored.put(Collection::Suppliers, &record("a")).await.unwrap();
        assert!(remote.ids(Collection::Suppliers).is_empty());
        assert_eq!(local.ids(Collection::Suppliers), vec!["a"]);
        assert_eq!(mirrored.pending_len().await, 1);

        let loaded = mirrored.load(Collection::Suppliers).await.unwrap();
        assert_eq!(loaded.len(), 1);

        remote.set_unavailable(false);
        assert!(mirrored.flush_pending().await);
        assert_eq!(remote.ids(Collection::Suppliers), vec!["a"]);
    }

    #[tokio::test]
    async fn queued_remove_is_replayed_after_queued_put() {
        let (remote, _local, mirrored) = setup();
        remote.set_unavailable(true);
        mirrored.put(Collection::Customers, &record("c")).await.unwrap();
        assert!(mirrored.remove(Collection::Customers, "c").await.unwrap());

        remote.set_unavailable(false);
        let loaded = mirrored.load(Collection::Customers).await.unwrap();
        assert!(loaded.is_empty());
        assert_eq!(mirrored.pending_len().await, 0);
    }

    #[tokio::test]
    async fn rejections_are_not_masked() {
        let (remote, local, mirrored) = setup();
        remote.set_rejecting(true);

        let err = mirrored
            .put(Collection::Suppliers, &record("a"))
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::Rejected { .. }));
        assert!(local.ids(Collection::Suppliers).is_empty());
    }

    #[tokio::test]
    async fn remote_deletions_are_pruned_from_mirror() {
        let (remote, local, mirrored) = setup();
        mirrored.put(Collection::Suppliers, &record("a")).await.unwrap();
        mirrored.put(Collection::Suppliers, &record("b")).await.unwrap();
        remote.remove(Collection::Suppliers, "a").await.unwrap();

        let online = mirrored.load(Collection::Suppliers).await.unwrap();
        assert_eq!(online.len(), 1);
        assert_eq!(local.ids(Collection::Suppliers), vec!["b"]);

        remote.set_unavailable(true);
        let offline = mirrored.load(Collection::Suppliers).await.unwrap();
        assert_eq!(offline, online);
    }

    #[tokio::test]
    async fn pruning_spares_records_with_queued_writes() {
        let (remote, local, mirrored) = setup();
        let mut pending = mirrored.pending.lock().await;
        pending.push_back(PendingOp::Put(Collection::Customers, record("q")));
        drop(pending);
        local.put(Collection::Customers, &record("q")).await.unwrap();
        local.put(Collection::Customers, &record("stale")).await.unwrap();

        mirrored.refresh_mirror(Collection::Customers, &[]).await;

        assert_eq!(local.ids(Collection::Customers), vec!["q"]);
        assert!(remote.ids(Collection::Customers).is_empty());
    }

    #[tokio::test]
    async fn remote_load_refreshes_local_mirror() {
        let (remote, local, mirrored) = setup();
        remote.put(Collection::Accounts, &record("x")).await.unwrap();

        mirrored.load(Collection::Accounts).await.unwrap();
        assert_eq!(local.ids(Collection::Accounts), vec!["x"]);
    }
}
