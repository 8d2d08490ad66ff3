//! Suppliers and their create/update inputs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::{AccountKind, AccountOwner};
use super::collection::Collection;
use super::entity::{merge, Entity, Party};
use super::error::{accumulate, validate_amount, validate_contact, DomainError};
use super::id::SupplierId;

/// A supplier as held by the entity store.
///
/// `id` and the purchase accumulators are private: they are set by the store
/// on creation and by purchase recording, never by the CRUD surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    id: SupplierId,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub tax_number: String,
    #[serde(default)]
    pub payment_terms: String,
    #[serde(default)]
    total_purchases: Decimal,
    #[serde(default)]
    last_order: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Supplier {
    #[must_use]
    pub fn id(&self) -> &SupplierId {
        &self.id
    }

    #[must_use]
    pub fn total_purchases(&self) -> Decimal {
        self.total_purchases
    }

    #[must_use]
    pub fn last_order(&self) -> Option<DateTime<Utc>> {
        self.last_order
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Input for adding a supplier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewSupplier {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub tax_number: String,
    pub payment_terms: String,
}

impl NewSupplier {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }
}

/// Partial update for a supplier. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SupplierPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub tax_number: Option<String>,
    pub payment_terms: Option<String>,
}

impl SupplierPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Entity for Supplier {
    const COLLECTION: Collection = Collection::Suppliers;

    fn key(&self) -> &str {
        self.id.as_str()
    }
}

impl Party for Supplier {
    type Draft = NewSupplier;
    type Patch = SupplierPatch;

    const ACCOUNT_KIND: AccountKind = AccountKind::Payable;

    fn create(draft: NewSupplier, now: DateTime<Utc>) -> Result<Self, DomainError> {
        validate_contact(&draft.name, &draft.email)?;
        Ok(Self {
            id: SupplierId::generate(),
            name: draft.name.trim().to_string(),
            phone: draft.phone.trim().to_string(),
            email: draft.email.trim().to_string(),
            address: draft.address.trim().to_string(),
            tax_number: draft.tax_number.trim().to_string(),
            payment_terms: draft.payment_terms.trim().to_string(),
            total_purchases: Decimal::ZERO,
            last_order: None,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: SupplierPatch, now: DateTime<Utc>) -> Result<(), DomainError> {
        let mut next = self.clone();
        merge(&mut next.name, patch.name);
        merge(&mut next.phone, patch.phone);
        merge(&mut next.email, patch.email);
        merge(&mut next.address, patch.address);
        merge(&mut next.tax_number, patch.tax_number);
        merge(&mut next.payment_terms, patch.payment_terms);
        validate_contact(&next.name, &next.email)?;
        next.updated_at = now;
        *self = next;
        Ok(())
    }

    fn record(&mut self, amount: Decimal, at: DateTime<Utc>) -> Result<(), DomainError> {
        validate_amount(amount)?;
        self.total_purchases = accumulate(self.total_purchases, amount)?;
        self.last_order = Some(self.last_order.map_or(at, |prev| prev.max(at)));
        self.updated_at = at.max(self.updated_at);
        Ok(())
    }

    fn owner(&self) -> AccountOwner {
        AccountOwner::Supplier(self.id.clone())
    }
}
