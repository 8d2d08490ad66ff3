//! In-memory collections owned by the store.

use crate::domain::{AccountOwner, Customer, Entity, LinkedAccount, Supplier};

/// Snapshot-able collections, each in insertion order.
#[derive(Debug, Default)]
pub(crate) struct StoreState {
    suppliers: Vec<Supplier>,
    customers: Vec<Customer>,
    accounts: Vec<LinkedAccount>,
}

/// Entities the store keeps a collection of.
pub(crate) trait Stored: Entity {
    fn rows(state: &StoreState) -> &Vec<Self>;
    fn rows_mut(state: &mut StoreState) -> &mut Vec<Self>;
}

impl Stored for Supplier {
    fn rows(state: &StoreState) -> &Vec<Self> {
        &state.suppliers
    }

    fn rows_mut(state: &mut StoreState) -> &mut Vec<Self> {
        &mut state.suppliers
    }
}

impl Stored for Customer {
    fn rows(state: &StoreState) -> &Vec<Self> {
        &state.customers
    }

    fn rows_mut(state: &mut StoreState) -> &mut Vec<Self> {
        &mut state.customers
    }
}

impl Stored for LinkedAccount {
    fn rows(state: &StoreState) -> &Vec<Self> {
        &state.accounts
    }

    fn rows_mut(state: &mut StoreState) -> &mut Vec<Self> {
        &mut state.accounts
    }
}

impl StoreState {
    pub(crate) fn all<E: Stored>(&self) -> &[E] {
        E::rows(self)
    }

    pub(crate) fn find<E: Stored>(&self, key: &str) -> Option<&E> {
        E::rows(self).iter().find(|e| e.key() == key)
    }

    /// Replace the record with the same key in place, or append it.
    pub(crate) fn upsert<E: Stored>(&mut self, entity: E) {
        let rows = E::rows_mut(self);
        match rows.iter_mut().find(|e| e.key() == entity.key()) {
            Some(slot) => *slot = entity,
            None => rows.push(entity),
        }
    }

    pub(crate) fn remove<E: Stored>(&mut self, key: &str) -> Option<E> {
        let rows = E::rows_mut(self);
        let index = rows.iter().position(|e| e.key() == key)?;
        Some(rows.remove(index))
    }

    pub(crate) fn account_of(&self, owner: &AccountOwner) -> Option<&LinkedAccount> {
        self.accounts.iter().find(|a| a.owner() == owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewSupplier, Party};
    use chrono::Utc;

    fn supplier(name: &str) -> Supplier {
        Supplier::create(NewSupplier::new(name), Utc::now()).unwrap()
    }

    #[test]
    fn upsert_keeps_position_of_existing_record() {
        let mut state = StoreState::default();
        let mut a = supplier("A");
        state.upsert(a.clone());
        state.upsert(supplier("B"));

        a.name = "A2".into();
        state.upsert(a.clone());

        let names: Vec<_> = state.all::<Supplier>().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A2", "B"]);
    }

    #[test]
    fn remove_returns_the_record() {
        let mut state = StoreState::default();
        let a = supplier("A");
        state.upsert(a.clone());

        assert_eq!(state.remove::<Supplier>(a.key()), Some(a.clone()));
        assert!(state.remove::<Supplier>(a.key()).is_none());
        assert!(state.all::<Supplier>().is_empty());
    }
}
