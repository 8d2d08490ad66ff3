//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`memory`] - In-memory [`PersistenceAdapter`](crate::port::PersistenceAdapter)
//!   with outage and failure injection.
//! - [`listener`] - Counting listener for notification assertions.
//! - [`domain`] - Builders for suppliers and customers.

pub mod domain;
pub mod listener;
pub mod memory;
