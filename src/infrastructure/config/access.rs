//! Role and permission overrides.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::domain::{DomainError, PermissionTable, Section};

/// Additions to the built-in permission table.
///
/// ```toml
/// [access]
/// fallback_role = "admin"
///
/// [access.roles]
/// auditor = ["reports", "accounting"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Role applied to absent or unknown roles. Defaults to `admin`.
    pub fallback_role: Option<String>,
    /// Roles to add, or built-in roles whose sections are replaced.
    pub roles: BTreeMap<String, BTreeSet<Section>>,
}

impl AccessConfig {
    /// Built-in table with these overrides applied.
    ///
    /// # Errors
    /// Returns [`DomainError::UnknownRole`] if the fallback role is not defined.
    pub fn permission_table(&self) -> Result<PermissionTable, DomainError> {
        let table = self
            .roles
            .iter()
            .fold(PermissionTable::builtin(), |table, (role, sections)| {
                table.with_role(role, sections.clone())
            });
        match &self.fallback_role {
            Some(role) => table.with_fallback(role),
            None => Ok(table),
        }
    }
}
