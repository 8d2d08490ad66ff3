//! Supplier and customer operations.
//!
//! Both party kinds share one implementation: each owns a linked ledger
//! account that is opened, posted to, and closed together with the party.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;

use super::state::Stored;
use super::EntityStore;
use crate::domain::{
    Customer, CustomerId, CustomerPatch, Entity, LinkedAccount, NewCustomer, NewSupplier, Party,
    Supplier, SupplierId, SupplierPatch,
};
use crate::error::{Error, Result};

impl EntityStore {
    /// Snapshot of all suppliers, in insertion order.
    #[must_use]
    pub fn suppliers(&self) -> Vec<Supplier> {
        self.snapshot()
    }

    #[must_use]
    pub fn supplier(&self, id: &SupplierId) -> Option<Supplier> {
        self.lookup(id.as_str())
    }

    /// Add a supplier with a fresh id, zero purchases, and a payable account.
    ///
    /// # Errors
    /// Validation errors for bad input; persistence errors leave the store
    /// unchanged.
    pub async fn add_supplier(&self, draft: NewSupplier) -> Result<Supplier> {
        self.add_party::<Supplier>(draft).await
    }

    /// Merge `patch` into the supplier.
    ///
    /// # Errors
    /// [`Error::NotFound`] for an unknown id, validation or persistence
    /// errors otherwise; on error nothing changes.
    pub async fn update_supplier(&self, id: &SupplierId, patch: SupplierPatch) -> Result<Supplier> {
        self.update_party::<Supplier>(id.as_str(), patch).await
    }

    /// Delete the supplier and its linked account.
    ///
    /// # Errors
    /// [`Error::NotFound`] for an unknown id, persistence errors otherwise.
    pub async fn delete_supplier(&self, id: &SupplierId) -> Result<Supplier> {
        self.delete_party::<Supplier>(id.as_str()).await
    }

    /// Record a purchase from the supplier: grows `total_purchases`, moves
    /// `last_order`, and posts the amount to the payable account.
    ///
    /// # Errors
    /// [`Error::NotFound`], a validation error for a non-positive amount, or
    /// a persistence error.
    pub async fn record_purchase(
        &self,
        id: &SupplierId,
        amount: Decimal,
        at: DateTime<Utc>,
    ) -> Result<Supplier> {
        self.record_party::<Supplier>(id.as_str(), amount, at).await
    }

    /// Snapshot of all customers, in insertion order.
    #[must_use]
    pub fn customers(&self) -> Vec<Customer> {
        self.snapshot()
    }

    #[must_use]
    pub fn customer(&self, id: &CustomerId) -> Option<Customer> {
        self.lookup(id.as_str())
    }

    /// Add a customer with a fresh id, zero sales, and a receivable account.
    ///
    /// # Errors
    /// See [`EntityStore::add_supplier`].
    pub async fn add_customer(&self, draft: NewCustomer) -> Result<Customer> {
        self.add_party::<Customer>(draft).await
    }

    /// # Errors
    /// See [`EntityStore::update_supplier`].
    pub async fn update_customer(&self, id: &CustomerId, patch: CustomerPatch) -> Result<Customer> {
        self.update_party::<Customer>(id.as_str(), patch).await
    }

    /// # Errors
    /// See [`EntityStore::delete_supplier`].
    pub async fn delete_customer(&self, id: &CustomerId) -> Result<Customer> {
        self.delete_party::<Customer>(id.as_str()).await
    }

    /// Record a sale to the customer.
    ///
    /// # Errors
    /// See [`EntityStore::record_purchase`].
    pub async fn record_sale(
        &self,
        id: &CustomerId,
        amount: Decimal,
        at: DateTime<Utc>,
    ) -> Result<Customer> {
        self.record_party::<Customer>(id.as_str(), amount, at).await
    }

    async fn add_party<P: Party + Stored>(&self, draft: P::Draft) -> Result<P> {
        let now = Utc::now();
        let party = P::create(draft, now)?;
        let account = LinkedAccount::open(party.owner(), P::ACCOUNT_KIND, now);

        let gate = self.write_gate.lock().await;
        self.persist(&party).await?;
        if let Err(err) = self.persist(&account).await {
            self.compensate_remove::<P>(party.key()).await;
            return Err(err);
        }
        {
            let mut state = self.state.write();
            state.upsert(party.clone());
            state.upsert(account);
        }
        drop(gate);

        info!(collection = %P::COLLECTION, id = party.key(), "Record added");
        self.notify();
        Ok(party)
    }

    async fn update_party<P: Party + Stored>(&self, key: &str, patch: P::Patch) -> Result<P> {
        let gate = self.write_gate.lock().await;
        let mut party = self
            .lookup::<P>(key)
            .ok_or_else(|| Error::not_found(P::COLLECTION, key))?;
        party.apply(patch, Utc::now())?;

        self.persist(&party).await?;
        self.state.write().upsert(party.clone());
        drop(gate);

        info!(collection = %P::COLLECTION, id = key, "Record updated");
        self.notify();
        Ok(party)
    }

    async fn delete_party<P: Party + Stored>(&self, key: &str) -> Result<P> {
        let gate = self.write_gate.lock().await;
        let party = self
            .lookup::<P>(key)
            .ok_or_else(|| Error::not_found(P::COLLECTION, key))?;
        let account = self.account_for(&party.owner());

        if let Some(account) = &account {
            self.unpersist::<LinkedAccount>(account.key()).await?;
        }
        if let Err(err) = self.unpersist::<P>(key).await {
            if let Some(account) = &account {
                self.compensate_put(account).await;
            }
            return Err(err);
        }
        {
            let mut state = self.state.write();
            state.remove::<P>(key);
            if let Some(account) = &account {
                state.remove::<LinkedAccount>(account.key());
            }
        }
        drop(gate);

        info!(
            collection = %P::COLLECTION,
            id = key,
            account = ?account.as_ref().map(|a| a.code()),
            "Record deleted with linked account"
        );
        self.notify();
        Ok(party)
    }

    async fn record_party<P: Party + Stored>(
        &self,
        key: &str,
        amount: Decimal,
        at: DateTime<Utc>,
    ) -> Result<P> {
        let gate = self.write_gate.lock().await;
        let previous = self
            .lookup::<P>(key)
            .ok_or_else(|| Error::not_found(P::COLLECTION, key))?;
        let mut party = previous.clone();
        party.record(amount, at)?;

        // Parties stored before accounts existed get one on first activity.
        let mut account = self
            .account_for(&party.owner())
            .unwrap_or_else(|| LinkedAccount::open(party.owner(), P::ACCOUNT_KIND, at));
        account.post(amount)?;

        self.persist(&party).await?;
        if let Err(err) = self.persist(&account).await {
            self.compensate_put(&previous).await;
            return Err(err);
        }
        {
            let mut state = self.state.write();
            state.upsert(party.clone());
            state.upsert(account);
        }
        drop(gate);

        info!(collection = %P::COLLECTION, id = key, %amount, "Activity recorded");
        self.notify();
        Ok(party)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::{AccountKind, Collection};
    use crate::testkit::domain::{acme, customer};
    use crate::testkit::listener::CountingListener;
    use crate::testkit::memory::MemoryAdapter;
    use rust_decimal_macros::dec;

    async fn store() -> (Arc<MemoryAdapter>, EntityStore) {
        let adapter = Arc::new(MemoryAdapter::new());
        let store = EntityStore::open(adapter.clone()).await.unwrap();
        (adapter, store)
    }

    #[tokio::test]
    async fn add_opens_payable_account() {
        let (adapter, store) = store().await;
        let supplier = store.add_supplier(acme()).await.unwrap();

        let account = store.account_for(&supplier.owner()).unwrap();
        assert_eq!(account.kind(), AccountKind::Payable);
        assert_eq!(adapter.ids(Collection::Accounts), vec![account.id().to_string()]);
    }

    #[tokio::test]
    async fn failed_account_write_compensates_supplier() {
        let (adapter, store) = store().await;
        adapter.fail_writes_to(Collection::Accounts, true);
        let listener = CountingListener::new();
        store.add_listener(Arc::new(listener.clone()));

        assert!(store.add_supplier(acme()).await.is_err());
        assert!(store.suppliers().is_empty());
        assert!(adapter.ids(Collection::Suppliers).is_empty());
        assert_eq!(listener.count(), 0);
    }

    #[tokio::test]
    async fn failed_supplier_removal_restores_account() {
        let (adapter, store) = store().await;
        let supplier = store.add_supplier(acme()).await.unwrap();
        let account = store.account_for(&supplier.owner()).unwrap();
        adapter.fail_writes_to(Collection::Suppliers, true);

        assert!(store.delete_supplier(supplier.id()).await.is_err());
        assert_eq!(store.suppliers().len(), 1);
        assert_eq!(adapter.ids(Collection::Accounts), vec![account.id().to_string()]);
    }

    #[tokio::test]
    async fn record_purchase_posts_to_account() {
        let (_adapter, store) = store().await;
        let supplier = store.add_supplier(acme()).await.unwrap();
        let at = Utc::now();

        let updated = store
            .record_purchase(supplier.id(), dec!(250.75), at)
            .await
            .unwrap();
        assert_eq!(updated.total_purchases(), dec!(250.75));
        assert_eq!(updated.last_order(), Some(at));
        assert_eq!(
            store.account_for(&supplier.owner()).unwrap().balance(),
            dec!(250.75)
        );
    }

    #[tokio::test]
    async fn failed_account_post_restores_supplier_in_backend() {
        let (adapter, store) = store().await;
        let supplier = store.add_supplier(acme()).await.unwrap();
        adapter.fail_writes_to(Collection::Accounts, true);

        assert!(store
            .record_purchase(supplier.id(), dec!(10), Utc::now())
            .await
            .is_err());

        let stored: Supplier = adapter
            .get(Collection::Suppliers, supplier.id().as_str())
            .unwrap()
            .decode()
            .unwrap();
        assert_eq!(stored.total_purchases(), Decimal::ZERO);
        assert_eq!(store.supplier(supplier.id()).unwrap().total_purchases(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn overflowing_purchase_is_rejected_without_writing() {
        let (adapter, store) = store().await;
        let supplier = store.add_supplier(acme()).await.unwrap();
        let half = Decimal::MAX / dec!(2) + dec!(1);
        store
            .record_purchase(supplier.id(), half, Utc::now())
            .await
            .unwrap();
        let writes = adapter.write_count();

        let err = store
            .record_purchase(supplier.id(), half, Utc::now())
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(adapter.write_count(), writes);
        assert_eq!(store.supplier(supplier.id()).unwrap().total_purchases(), half);
        assert_eq!(store.account_for(&supplier.owner()).unwrap().balance(), half);
    }

    #[tokio::test]
    async fn record_rejects_non_positive_amount_without_writing() {
        let (adapter, store) = store().await;
        let supplier = store.add_supplier(acme()).await.unwrap();
        let writes = adapter.write_count();

        let err = store
            .record_purchase(supplier.id(), dec!(-1), Utc::now())
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(adapter.write_count(), writes);
    }

    #[tokio::test]
    async fn customers_get_receivable_accounts_and_cascade() {
        let (_adapter, store) = store().await;
        let noor = store.add_customer(customer("Noor Trading")).await.unwrap();
        store.record_sale(noor.id(), dec!(40), Utc::now()).await.unwrap();

        let account = store.account_for(&noor.owner()).unwrap();
        assert_eq!(account.kind(), AccountKind::Receivable);
        assert_eq!(account.balance(), dec!(40));

        store.delete_customer(noor.id()).await.unwrap();
        assert!(store.customers().is_empty());
        assert!(store.accounts().is_empty());
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let (_adapter, store) = store().await;
        let missing = SupplierId::from("missing");

        assert!(store
            .update_supplier(&missing, SupplierPatch::default())
            .await
            .unwrap_err()
            .is_not_found());
        assert!(store.delete_supplier(&missing).await.unwrap_err().is_not_found());
        assert!(store
            .record_purchase(&missing, dec!(1), Utc::now())
            .await
            .unwrap_err()
            .is_not_found());
    }
}
