//! Startup wiring: configuration to a ready [`AppContext`].

use tracing::info;

use super::config::Config;
use super::factory::build_adapter;
use crate::application::{AppContext, EntityStore};
use crate::domain::Navigation;
use crate::error::Result;

/// Build the persistence adapter, open the store, and assemble the context.
///
/// # Errors
/// Returns an error if the adapter cannot be built, the store cannot be
/// hydrated, or the permission table is invalid.
pub async fn bootstrap(config: &Config) -> Result<AppContext> {
    let permissions = config.permission_table()?;
    let adapter = build_adapter(&config.persistence)?;
    let store = EntityStore::open(adapter).await?;

    info!(
        suppliers = store.suppliers().len(),
        customers = store.customers().len(),
        fallback_role = permissions.fallback(),
        "Application context ready"
    );
    Ok(AppContext::new(store, permissions, Navigation::builtin()))
}
