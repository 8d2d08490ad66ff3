//! Infrastructure: configuration, logging, and startup wiring.

pub mod bootstrap;
pub mod config;
pub mod factory;

pub use bootstrap::bootstrap;
