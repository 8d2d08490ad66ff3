//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                  ┌──────────────────────────┐
//!   CLI / views ──▶│  EntityStore (application)│──▶ Listener
//!                  └────────────┬─────────────┘
//!                               ▼
//!                      PersistenceAdapter
//!               ┌───────────────┼───────────────┐
//!               ▼               ▼               ▼
//!         SqliteAdapter   RestAdapter    MirroredAdapter
//! ```
//!
//! # Available Ports
//!
//! - [`PersistenceAdapter`] - Durable storage of collection records
//! - [`Listener`] - Change notification for views

pub mod outbound;

pub use outbound::listener::{Listener, ListenerId};
pub use outbound::persistence::{PersistenceAdapter, Record};
