//! Outbound adapters: persistence backends behind the entity store.
//!
//! - [`sqlite`] - local store (local-only strategy and mirror target)
//! - [`rest`] - remote PostgREST-style store (remote-only strategy)
//! - [`mirror`] - remote-primary store with local fallback

pub mod mirror;
pub mod rest;
pub mod sqlite;

pub use mirror::MirroredAdapter;
pub use rest::RestAdapter;
pub use sqlite::SqliteAdapter;
