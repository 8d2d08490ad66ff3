//! Persistence factory: turns the configured strategy into an adapter.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::{MirroredAdapter, RestAdapter, SqliteAdapter};
use crate::error::Result;
use crate::infrastructure::config::{PersistenceConfig, Strategy};
use crate::port::PersistenceAdapter;

/// Build the persistence adapter selected by `config.strategy`.
///
/// # Errors
/// Returns an error if the local database cannot be opened or migrated, or
/// the remote client cannot be built.
pub fn build_adapter(config: &PersistenceConfig) -> Result<Arc<dyn PersistenceAdapter>> {
    let adapter: Arc<dyn PersistenceAdapter> = match config.strategy {
        Strategy::Local => Arc::new(SqliteAdapter::open(&config.local.path)?),
        Strategy::Remote => Arc::new(RestAdapter::from_config(&config.remote)?),
        Strategy::Mirrored => {
            let remote = Arc::new(RestAdapter::from_config(&config.remote)?);
            let local = Arc::new(SqliteAdapter::open(&config.local.path)?);
            Arc::new(MirroredAdapter::new(remote, local))
        }
    };

    info!(
        strategy = %config.strategy,
        backend = adapter.name(),
        has_api_key = config.remote.api_key.is_some(),
        "Persistence adapter ready"
    );
    Ok(adapter)
}
