//! Process-wide application context.
//!
//! Built once at startup and cloned into every consumer. Cloning is cheap:
//! all fields are shared handles, so every clone sees the same store.

use std::sync::Arc;

use super::store::EntityStore;
use crate::domain::{NavEntry, Navigation, PermissionTable};

#[derive(Clone)]
pub struct AppContext {
    store: Arc<EntityStore>,
    permissions: Arc<PermissionTable>,
    navigation: Arc<Navigation>,
}

impl AppContext {
    #[must_use]
    pub fn new(store: EntityStore, permissions: PermissionTable, navigation: Navigation) -> Self {
        Self {
            store: Arc::new(store),
            permissions: Arc::new(permissions),
            navigation: Arc::new(navigation),
        }
    }

    #[must_use]
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Shared handle to the store, for consumers that outlive a borrow.
    #[must_use]
    pub fn store_handle(&self) -> Arc<EntityStore> {
        Arc::clone(&self.store)
    }

    #[must_use]
    pub fn permissions(&self) -> &PermissionTable {
        &self.permissions
    }

    /// Menu entries visible to `role`. An absent role uses the fallback.
    #[must_use]
    pub fn menu_for(&self, role: Option<&str>) -> Vec<NavEntry> {
        self.navigation
            .visible_for(&self.permissions, role)
            .into_iter()
            .cloned()
            .collect()
    }
}
