//! Application state: every store wired to one persistence backend.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::events::Notifier;
use crate::services::{AccountStore, CartStore, CheckoutService, WishlistStore};
use crate::storage::{FileStore, KeyValueStore};

/// The catalog plus the cart, wishlist and account stores, sharing one
/// key-value store and one notifier.
pub struct Storefront {
    config: StorefrontConfig,
    store: Arc<dyn KeyValueStore>,
    notifier: Notifier,
    catalog: Catalog,
    cart: CartStore,
    wishlist: WishlistStore,
    accounts: AccountStore,
}

impl Storefront {
    /// Load every store from `store`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Catalog` if the bundled catalog is malformed.
    /// Returns `AppError::Storage` if persisted state cannot be read.
    pub fn open(
        config: StorefrontConfig,
        store: Arc<dyn KeyValueStore>,
        notifier: Notifier,
    ) -> Result<Self, AppError> {
        let catalog = Catalog::seeded()?;
        let cart = CartStore::load(store.clone(), notifier.clone())?;
        let wishlist = WishlistStore::load(store.clone(), notifier.clone())?;
        let accounts = AccountStore::load(store.clone(), notifier.clone())?;

        tracing::debug!(
            products = catalog.len(),
            cart_lines = cart.lines().len(),
            wishlist_items = wishlist.count(),
            "Storefront ready"
        );

        Ok(Self {
            config,
            store,
            notifier,
            catalog,
            cart,
            wishlist,
            accounts,
        })
    }

    /// Open a storefront persisted under `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the directory cannot be created or
    /// read, or `AppError::Catalog` if the bundled catalog is malformed.
    pub fn open_dir(config: StorefrontConfig, notifier: Notifier) -> Result<Self, AppError> {
        let store = Arc::new(FileStore::open(&config.data_dir)?);
        Self::open(config, store, notifier)
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Get the shared notifier, e.g. to subscribe an observer.
    #[must_use]
    pub const fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    pub const fn wishlist_mut(&mut self) -> &mut WishlistStore {
        &mut self.wishlist
    }

    #[must_use]
    pub const fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    pub const fn accounts_mut(&mut self) -> &mut AccountStore {
        &mut self.accounts
    }

    /// Start a checkout over this storefront's cart and accounts.
    pub fn checkout(&mut self) -> CheckoutService<'_> {
        CheckoutService::new(
            &mut self.cart,
            &mut self.accounts,
            self.store.as_ref(),
            &self.config.checkout,
            self.notifier.clone(),
        )
    }
}
