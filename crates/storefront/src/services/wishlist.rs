//! Wishlist store.

use std::sync::Arc;

use tracing::instrument;

use pocketshop_core::ProductId;

use crate::events::{Notifier, WishlistEvent};
use crate::models::wishlist::WishlistItem;
use crate::storage::{self, KeyValueStore, StorageError, keys};

/// A set of saved products, unique by product ID.
pub struct WishlistStore {
    store: Arc<dyn KeyValueStore>,
    notifier: Notifier,
    items: Vec<WishlistItem>,
}

impl WishlistStore {
    /// Load the persisted wishlist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the persisted wishlist cannot be read or decoded.
    pub fn load(store: Arc<dyn KeyValueStore>, notifier: Notifier) -> Result<Self, StorageError> {
        let mut items: Vec<WishlistItem> =
            storage::load_collection(store.as_ref(), keys::WISHLIST)?;

        // Keep the first occurrence of each ID
        let mut seen = std::collections::HashSet::new();
        items.retain(|item| seen.insert(item.id));

        Ok(Self {
            store,
            notifier,
            items,
        })
    }

    /// Saved items, oldest first.
    #[must_use]
    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    /// Number of saved items.
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Whether `id` is saved.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Save an item. Returns `false` (and stores nothing) if it is already
    /// present.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the wishlist cannot be persisted.
    #[instrument(skip(self, item), fields(product_id = %item.id))]
    pub fn add(&mut self, item: WishlistItem) -> Result<bool, StorageError> {
        let product_id = item.id;
        if self.contains(product_id) {
            self.notifier
                .emit(WishlistEvent::AlreadyPresent { product_id });
            return Ok(false);
        }

        self.items.push(item);
        self.persist()?;
        self.notifier.emit(WishlistEvent::Added { product_id });
        Ok(true)
    }

    /// Drop `id` from the wishlist. Returns whether it was present.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the wishlist cannot be persisted.
    #[instrument(skip(self))]
    pub fn remove(&mut self, id: ProductId) -> Result<bool, StorageError> {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        let removed = before != self.items.len();

        self.persist()?;
        if removed {
            self.notifier
                .emit(WishlistEvent::Removed { product_id: id });
        }
        Ok(removed)
    }

    /// Add the item if absent, remove it if present. Returns whether the
    /// item is saved afterwards.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the wishlist cannot be persisted.
    pub fn toggle(&mut self, item: WishlistItem) -> Result<bool, StorageError> {
        if self.contains(item.id) {
            self.remove(item.id)?;
            Ok(false)
        } else {
            self.add(item)
        }
    }

    fn persist(&self) -> Result<(), StorageError> {
        storage::save_json(self.store.as_ref(), keys::WISHLIST, &self.items)
    }
}
