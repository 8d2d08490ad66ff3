//! Outbound ports (driven side): interfaces implemented by outbound adapters
//! and by the views subscribing to the store.

pub mod listener;
pub mod persistence;
