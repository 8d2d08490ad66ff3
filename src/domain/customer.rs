//! Customers and their create/update inputs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::{AccountKind, AccountOwner};
use super::collection::Collection;
use super::entity::{merge, Entity, Party};
use super::error::{accumulate, validate_amount, validate_contact, DomainError};
use super::id::CustomerId;

/// A customer as held by the entity store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    id: CustomerId,
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
    credit_limit: Decimal,
    #[serde(default)]
    total_sales: Decimal,
    #[serde(default)]
    last_sale: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Customer {
    #[must_use]
    pub fn id(&self) -> &CustomerId {
        &self.id
    }

    #[must_use]
    pub fn credit_limit(&self) -> Decimal {
        self.credit_limit
    }

    #[must_use]
    pub fn total_sales(&self) -> Decimal {
        self.total_sales
    }

    #[must_use]
    pub fn last_sale(&self) -> Option<DateTime<Utc>> {
        self.last_sale
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

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub tax_number: String,
    pub credit_limit: Decimal,
}

impl NewCustomer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub tax_number: Option<String>,
    pub credit_limit: Option<Decimal>,
}

impl CustomerPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn validate_credit_limit(limit: Decimal) -> Result<(), DomainError> {
    if limit < Decimal::ZERO {
        return Err(DomainError::NegativeCreditLimit { limit });
    }
    Ok(())
}

impl Entity for Customer {
    const COLLECTION: Collection = Collection::Customers;

    fn key(&self) -> &str {
        self.id.as_str()
    }
}

impl Party for Customer {
    type Draft = NewCustomer;
    type Patch = CustomerPatch;

    const ACCOUNT_KIND: AccountKind = AccountKind::Receivable;

    fn create(draft: NewCustomer, now: DateTime<Utc>) -> Result<Self, DomainError> {
        validate_contact(&draft.name, &draft.email)?;
        validate_credit_limit(draft.credit_limit)?;
        Ok(Self {
            id: CustomerId::generate(),
            name: draft.name.trim().to_string(),
            phone: draft.phone.trim().to_string(),
            email: draft.email.trim().to_string(),
            address: draft.address.trim().to_string(),
            tax_number: draft.tax_number.trim().to_string(),
            credit_limit: draft.credit_limit,
            total_sales: Decimal::ZERO,
            last_sale: None,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: CustomerPatch, now: DateTime<Utc>) -> Result<(), DomainError> {
        let mut next = self.clone();
        merge(&mut next.name, patch.name);
        merge(&mut next.phone, patch.phone);
        merge(&mut next.email, patch.email);
        merge(&mut next.address, patch.address);
        merge(&mut next.tax_number, patch.tax_number);
        if let Some(limit) = patch.credit_limit {
            validate_credit_limit(limit)?;
            next.credit_limit = limit;
        }
        validate_contact(&next.name, &next.email)?;
        next.updated_at = now;
        *self = next;
        Ok(())
    }

    fn record(&mut self, amount: Decimal, at: DateTime<Utc>) -> Result<(), DomainError> {
        validate_amount(amount)?;
        self.total_sales = accumulate(self.total_sales, amount)?;
        self.last_sale = Some(self.last_sale.map_or(at, |prev| prev.max(at)));
        self.updated_at = at.max(self.updated_at);
        Ok(())
    }

    fn owner(&self) -> AccountOwner {
        AccountOwner::Customer(self.id.clone())
    }
}
