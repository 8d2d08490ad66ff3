//! Role to section permission table.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Dashboard sections a role may be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Dashboard,
    Sales,
    Purchases,
    Suppliers,
    Customers,
    Inventory,
    Accounting,
    Reports,
    Users,
    Settings,
}

impl Section {
    pub const ALL: [Section; 10] = [
        Self::Dashboard,
        Self::Sales,
        Self::Purchases,
        Self::Suppliers,
        Self::Customers,
        Self::Inventory,
        Self::Accounting,
        Self::Reports,
        Self::Users,
        Self::Settings,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Sales => "sales",
            Self::Purchases => "purchases",
            Self::Suppliers => "suppliers",
            Self::Customers => "customers",
            Self::Inventory => "inventory",
            Self::Accounting => "accounting",
            Self::Reports => "reports",
            Self::Users => "users",
            Self::Settings => "settings",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == wanted)
            .ok_or_else(|| format!("unknown section '{s}'"))
    }
}

/// Role used when none is supplied or the supplied one is unknown.
pub const ADMIN_ROLE: &str = "admin";

static NO_SECTIONS: BTreeSet<Section> = BTreeSet::new();

/// Mapping from role name to the sections it may open.
///
/// Role names are matched case-insensitively. Lookups for a role that is
/// absent or not in the table resolve to the fallback role, which the
/// constructors guarantee is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionTable {
    roles: HashMap<String, BTreeSet<Section>>,
    fallback: String,
}

impl PermissionTable {
    /// Build a table from explicit entries.
    ///
    /// # Errors
    /// Returns [`DomainError::UnknownRole`] if `fallback` has no entry.
    pub fn new<I, S>(roles: I, fallback: &str) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (S, BTreeSet<Section>)>,
        S: AsRef<str>,
    {
        let roles = roles
            .into_iter()
            .map(|(role, sections)| (normalize(role.as_ref()), sections))
            .collect();
        Self {
            roles,
            fallback: normalize(fallback),
        }
        .checked()
    }

    /// The dashboard's built-in roles, falling back to `admin`.
    #[must_use]
    pub fn builtin() -> Self {
        use Section::*;

        let all: BTreeSet<Section> = Section::ALL.into_iter().collect();
        let manager = all
            .iter()
            .copied()
            .filter(|s| !matches!(s, Users | Settings))
            .collect();
        let roles = HashMap::from([
            (ADMIN_ROLE.to_string(), all),
            ("manager".to_string(), manager),
            (
                "accountant".to_string(),
                BTreeSet::from([Accounting, Reports, Suppliers, Customers, Purchases, Sales]),
            ),
            ("cashier".to_string(), BTreeSet::from([Sales, Customers])),
            (
                "storekeeper".to_string(),
                BTreeSet::from([Inventory, Purchases, Suppliers]),
            ),
        ]);
        Self {
            roles,
            fallback: ADMIN_ROLE.to_string(),
        }
    }

    /// Add a role, or replace the sections of an existing one.
    #[must_use]
    pub fn with_role(mut self, role: &str, sections: BTreeSet<Section>) -> Self {
        self.roles.insert(normalize(role), sections);
        self
    }

    /// Change the fallback role.
    ///
    /// # Errors
    /// Returns [`DomainError::UnknownRole`] if `role` has no entry.
    pub fn with_fallback(mut self, role: &str) -> Result<Self, DomainError> {
        self.fallback = normalize(role);
        self.checked()
    }

    fn checked(self) -> Result<Self, DomainError> {
        if self.roles.contains_key(&self.fallback) {
            Ok(self)
        } else {
            Err(DomainError::UnknownRole {
                role: self.fallback,
            })
        }
    }

    #[must_use]
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Name of the role whose permissions apply to `role`.
    #[must_use]
    pub fn resolve<'a>(&'a self, role: Option<&str>) -> &'a str {
        role.map(normalize)
            .and_then(|role| self.roles.get_key_value(&role).map(|(k, _)| k.as_str()))
            .unwrap_or(self.fallback.as_str())
    }

    /// Sections granted to `role`.
    #[must_use]
    pub fn sections_for(&self, role: Option<&str>) -> &BTreeSet<Section> {
        self.roles
            .get(self.resolve(role))
            .unwrap_or(&NO_SECTIONS)
    }

    #[must_use]
    pub fn allows(&self, role: Option<&str>, section: Section) -> bool {
        self.sections_for(role).contains(&section)
    }

    /// Known role names, sorted.
    #[must_use]
    pub fn roles(&self) -> Vec<&str> {
        let mut roles: Vec<&str> = self.roles.keys().map(String::as_str).collect();
        roles.sort_unstable();
        roles
    }
}

impl Default for PermissionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize(role: &str) -> String {
    role.trim().to_lowercase()
}
