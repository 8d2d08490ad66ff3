//! Ledger accounts linked to suppliers and customers.
//!
//! Each party owns exactly one account, opened when the party is added and
//! closed when it is deleted. The store coordinates both sides.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::collection::Collection;
use super::entity::Entity;
use super::error::{accumulate, DomainError};
use super::id::{AccountId, CustomerId, SupplierId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    /// Money owed to a supplier.
    Payable,
    /// Money owed by a customer.
    Receivable,
}

impl AccountKind {
    const fn prefix(self) -> &'static str {
        match self {
            Self::Payable => "AP",
            Self::Receivable => "AR",
        }
    }
}

/// The party an account belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum AccountOwner {
    Supplier(SupplierId),
    Customer(CustomerId),
}

impl AccountOwner {
    fn short(&self) -> &str {
        match self {
            Self::Supplier(id) => id.short(),
            Self::Customer(id) => id.short(),
        }
    }
}

impl fmt::Display for AccountOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Supplier(id) => write!(f, "supplier:{id}"),
            Self::Customer(id) => write!(f, "customer:{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedAccount {
    id: AccountId,
    owner: AccountOwner,
    kind: AccountKind,
    code: String,
    #[serde(default)]
    balance: Decimal,
    created_at: DateTime<Utc>,
}

impl LinkedAccount {
    /// Open a zero-balance account for `owner`.
    #[must_use]
    pub fn open(owner: AccountOwner, kind: AccountKind, now: DateTime<Utc>) -> Self {
        let code = format!("{}-{}", kind.prefix(), owner.short().to_uppercase());
        Self {
            id: AccountId::generate(),
            owner,
            kind,
            code,
            balance: Decimal::ZERO,
            created_at: now,
        }
    }

    #[must_use]
    pub fn id(&self) -> &AccountId {
        &self.id
    }

    #[must_use]
    pub fn owner(&self) -> &AccountOwner {
        &self.owner
    }

    #[must_use]
    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Post an amount already validated by the owning party.
    pub(crate) fn post(&mut self, amount: Decimal) -> Result<(), DomainError> {
        self.balance = accumulate(self.balance, amount)?;
        Ok(())
    }
}

impl Entity for LinkedAccount {
    const COLLECTION: Collection = Collection::Accounts;

    fn key(&self) -> &str {
        self.id.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn open_derives_code_from_owner() {
        let owner = AccountOwner::Supplier(SupplierId::from("1a2b3c4d-0000"));
        let account = LinkedAccount::open(owner.clone(), AccountKind::Payable, Utc::now());
        assert_eq!(account.code(), "AP-1A2B3C4D");
        assert_eq!(account.owner(), &owner);
        assert_eq!(account.balance(), Decimal::ZERO);
    }

    #[test]
    fn post_adds_to_balance() {
        let owner = AccountOwner::Customer(CustomerId::from("c-1"));
        let mut account = LinkedAccount::open(owner, AccountKind::Receivable, Utc::now());
        account.post(dec!(10)).unwrap();
        account.post(dec!(2.5)).unwrap();
        assert_eq!(account.balance(), dec!(12.5));
    }

    #[test]
    fn post_refuses_to_overflow_balance() {
        let owner = AccountOwner::Supplier(SupplierId::from("s-1"));
        let mut account = LinkedAccount::open(owner, AccountKind::Payable, Utc::now());
        account.post(Decimal::MAX).unwrap();
        assert!(matches!(
            account.post(dec!(1)),
            Err(DomainError::AmountOverflow { .. })
        ));
        assert_eq!(account.balance(), Decimal::MAX);
    }

    #[test]
    fn owner_serializes_tagged() {
        let owner = AccountOwner::Supplier(SupplierId::from("s-1"));
        let json = serde_json::to_value(&owner).unwrap();
        assert_eq!(json, serde_json::json!({"type": "supplier", "id": "s-1"}));
    }
}
