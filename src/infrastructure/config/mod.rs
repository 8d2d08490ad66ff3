//! Infrastructure configuration modules.

pub mod access;
pub mod logging;
pub mod persistence;
pub mod settings;

pub use access::AccessConfig;
pub use logging::LoggingConfig;
pub use persistence::{LocalConfig, PersistenceConfig, Strategy};
pub use settings::Config;
