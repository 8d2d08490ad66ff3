//! SQLite local persistence.
//!
//! Provides connection management, schema definitions, Diesel model types,
//! and the [`SqliteAdapter`] record store.

pub mod connection;
pub mod model;
pub mod schema;
pub mod store;

pub use store::SqliteAdapter;
