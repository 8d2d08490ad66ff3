//! Application services (use cases).
//!
//! The [`EntityStore`] orchestrates domain rules and the persistence port;
//! [`AppContext`] carries it, together with the permission table and menu,
//! to every consumer.

pub mod context;
pub mod store;

pub use context::AppContext;
pub use store::EntityStore;
