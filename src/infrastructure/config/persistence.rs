//! Persistence strategy selection.

use std::fmt;

use serde::{Deserialize, Serialize};

pub use crate::adapter::outbound::rest::RemoteConfig;

/// Which backend the entity store writes through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// SQLite file on this machine only.
    #[default]
    Local,
    /// Remote database only; no offline use.
    Remote,
    /// Remote first, mirrored into SQLite and served from it during outages.
    Mirrored,
}

impl Strategy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
            Self::Mirrored => "mirrored",
        }
    }

    #[must_use]
    pub const fn uses_local(self) -> bool {
        matches!(self, Self::Local | Self::Mirrored)
    }

    #[must_use]
    pub const fn uses_remote(self) -> bool {
        matches!(self, Self::Remote | Self::Mirrored)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local SQLite settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Database file path, or `:memory:`.
    pub path: String,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            path: "dukkan.db".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub strategy: Strategy,
    pub local: LocalConfig,
    pub remote: RemoteConfig,
}
