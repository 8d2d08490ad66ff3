//! Navigation menu and the role-based visibility filter.

use serde::Serialize;

use super::access::{PermissionTable, Section};

/// One item of the dashboard side menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub path: String,
    pub label_ar: String,
    pub label_en: String,
    /// Section the role must hold; `None` means visible to everyone.
    pub requires: Option<Section>,
}

impl NavEntry {
    pub fn new(
        path: impl Into<String>,
        label_ar: impl Into<String>,
        label_en: impl Into<String>,
        requires: Option<Section>,
    ) -> Self {
        Self {
            path: path.into(),
            label_ar: label_ar.into(),
            label_en: label_en.into(),
            requires,
        }
    }
}

/// Ordered menu definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    entries: Vec<NavEntry>,
}

impl Navigation {
    #[must_use]
    pub fn new(entries: Vec<NavEntry>) -> Self {
        Self { entries }
    }

    /// The dashboard's side menu.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(vec![
            NavEntry::new("/", "لوحة التحكم", "Dashboard", None),
            NavEntry::new("/sales", "المبيعات", "Sales", Some(Section::Sales)),
            NavEntry::new("/purchases", "المشتريات", "Purchases", Some(Section::Purchases)),
            NavEntry::new("/suppliers", "الموردين", "Suppliers", Some(Section::Suppliers)),
            NavEntry::new("/customers", "العملاء", "Customers", Some(Section::Customers)),
            NavEntry::new("/inventory", "المخزون", "Inventory", Some(Section::Inventory)),
            NavEntry::new("/accounting", "المحاسبة", "Accounting", Some(Section::Accounting)),
            NavEntry::new("/reports", "التقارير", "Reports", Some(Section::Reports)),
            NavEntry::new("/users", "المستخدمين", "Users", Some(Section::Users)),
            NavEntry::new("/settings", "الإعدادات", "Settings", Some(Section::Settings)),
        ])
    }

    #[must_use]
    pub fn entries(&self) -> &[NavEntry] {
        &self.entries
    }

    /// Entries `role` may see, in menu order.
    ///
    /// Entries without a requirement are always included. An absent or
    /// unknown role gets the table's fallback permissions.
    #[must_use]
    pub fn visible_for<'a>(&'a self, table: &PermissionTable, role: Option<&str>) -> Vec<&'a NavEntry> {
        let granted = table.sections_for(role);
        self.entries
            .iter()
            .filter(|entry| entry.requires.map_or(true, |section| granted.contains(&section)))
            .collect()
    }
}

impl Default for Navigation {
    fn default() -> Self {
        Self::builtin()
    }
}
