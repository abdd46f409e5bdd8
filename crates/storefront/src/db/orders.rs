//! Order repository.
//!
//! Each account's orders live under their own key as an append-only list.

use pocketshop_core::AccountId;

use crate::models::order::Order;
use crate::storage::{self, KeyValueStore, StorageError, keys};

/// Repository for per-account order history.
pub struct OrderRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// All orders placed by `account`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the order list cannot be read or decoded.
    pub fn list(&self, account: &AccountId) -> Result<Vec<Order>, StorageError> {
        storage::load_collection(self.store, &keys::orders(account))
    }

    /// Append an order to `account`'s history.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the list cannot be read or written.
    pub fn append(&self, account: &AccountId, order: &Order) -> Result<(), StorageError> {
        let key = keys::orders(account);
        let mut orders: Vec<Order> = storage::load_collection(self.store, &key)?;
        orders.push(order.clone());
        storage::save_json(self.store, &key, &orders)?;
        tracing::debug!(%account, order_id = %order.id, count = orders.len(), "Appended order");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use pocketshop_core::{OrderId, OrderStatus, Price};

    use super::*;
    use crate::models::order::ShippingAddress;
    use crate::storage::MemoryStore;

    fn order(total: u32) -> Order {
        Order {
            id: OrderId::generate(),
            date: Utc::now(),
            total: Price::from_dollars(total),
            status: OrderStatus::Processing,
            items: Vec::new(),
            shipping_address: ShippingAddress::default(),
        }
    }

    #[test]
    fn test_append_preserves_order() {
        let store = MemoryStore::new();
        let repo = OrderRepository::new(&store);
        let account = AccountId::generate();

        repo.append(&account, &order(10)).unwrap();
        repo.append(&account, &order(20)).unwrap();

        let totals: Vec<Price> = repo.list(&account).unwrap().iter().map(|o| o.total).collect();
        assert_eq!(totals, vec![Price::from_dollars(10), Price::from_dollars(20)]);
    }

    #[test]
    fn test_histories_are_per_account() {
        let store = MemoryStore::new();
        let repo = OrderRepository::new(&store);
        let alice = AccountId::generate();
        let bob = AccountId::generate();

        repo.append(&alice, &order(10)).unwrap();

        assert_eq!(repo.list(&alice).unwrap().len(), 1);
        assert!(repo.list(&bob).unwrap().is_empty());
    }
}
