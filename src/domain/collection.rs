//! Named collections held by the entity store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A persisted collection of one entity type.
///
/// The string form doubles as the SQLite `collection` key and the remote
/// table name, so it must stay stable once data exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Suppliers,
    Customers,
    Accounts,
}

impl Collection {
    /// All collections in hydration order.
    pub const ALL: [Collection; 3] = [Self::Suppliers, Self::Customers, Self::Accounts];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Suppliers => "suppliers",
            Self::Customers => "customers",
            Self::Accounts => "accounts",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
