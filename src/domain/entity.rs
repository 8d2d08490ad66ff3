//! Traits shared by every stored entity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};

use super::account::{AccountKind, AccountOwner};
use super::collection::Collection;
use super::error::DomainError;

/// A record kept in one of the store's collections.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection the entity is persisted under.
    const COLLECTION: Collection;

    /// Stable key of the record within its collection.
    fn key(&self) -> &str;
}

/// A business party (supplier or customer) that owns a linked ledger account.
///
/// The store drives creation, partial updates, and activity recording for
/// both party kinds through this trait, so the write-through and cascade
/// logic exists once.
pub trait Party: Entity {
    /// Validated input for creation.
    type Draft;
    /// Partial update; absent fields stay unchanged.
    type Patch;

    /// Kind of account opened alongside a new party.
    const ACCOUNT_KIND: AccountKind;

    /// Build a new party with a fresh id and zeroed accumulators.
    fn create(draft: Self::Draft, now: DateTime<Utc>) -> Result<Self, DomainError>;

    /// Merge `patch` into `self`, validating the result.
    fn apply(&mut self, patch: Self::Patch, now: DateTime<Utc>) -> Result<(), DomainError>;

    /// Add a purchase or sale of `amount` made at `at` to the accumulator.
    fn record(&mut self, amount: Decimal, at: DateTime<Utc>) -> Result<(), DomainError>;

    /// Owner reference used by the linked account.
    fn owner(&self) -> AccountOwner;
}

/// Replace `field` with a trimmed `value` when one is provided.
pub(crate) fn merge(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value.trim().to_string();
    }
}
