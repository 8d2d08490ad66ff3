//! Dukkan - data core for a bilingual (Arabic/English) business dashboard.
//!
//! The crate holds the dashboard's shared business state and keeps it in sync
//! with a storage backend:
//!
//! - [`application::EntityStore`] owns suppliers, customers, and their linked
//!   ledger accounts, persists every mutation before applying it, and notifies
//!   subscribed listeners afterwards.
//! - [`port::PersistenceAdapter`] abstracts the backend. Three strategies are
//!   provided: local SQLite, a remote REST database, and remote with a local
//!   mirror that keeps working while the remote is unreachable.
//! - [`domain::PermissionTable`] and [`domain::Navigation`] decide which menu
//!   entries each role may see.
//! - [`application::AppContext`] bundles all of the above and is built once at
//!   startup by [`infrastructure::bootstrap`].
//!
//! # Example
//!
//! ```no_run
//! use dukkan::domain::NewSupplier;
//! use dukkan::infrastructure::{bootstrap, config::Config};
//!
//! # async fn run() -> dukkan::error::Result<()> {
//! let config = Config::load_or_default("dukkan.toml")?;
//! let ctx = bootstrap(&config).await?;
//! ctx.store()
//!     .add_supplier(NewSupplier::new("ACME").with_phone("+966500000000"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
