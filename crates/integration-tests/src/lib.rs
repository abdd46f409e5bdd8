//! Integration tests for Pocketshop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pocketshop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Register, shop, check out and read order history
//! - `persistence` - State written by one storefront is read by the next
//! - `cart_properties` - Cart totals and quantity rules over the real catalog
//!
//! Each [`TestContext`] owns a fresh data directory under the system temp
//! directory and removes it when dropped.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use pocketshop_storefront::Storefront;
use pocketshop_storefront::config::StorefrontConfig;
use pocketshop_storefront::events::{Notifier, RecordingObserver};
use pocketshop_storefront::services::CheckoutConfig;

/// A scratch data directory plus helpers to open storefronts over it.
pub struct TestContext {
    dir: PathBuf,
}

impl TestContext {
    /// Create a context with an empty, unique data directory.
    #[must_use]
    pub fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("pocketshop-it-{}", Uuid::new_v4()));
        Self { dir }
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.dir
    }

    /// Configuration pointing at this context's directory, with no payment
    /// delay.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig {
            data_dir: self.dir.clone(),
            checkout: CheckoutConfig {
                payment_delay: Duration::ZERO,
                ..CheckoutConfig::default()
            },
            ..StorefrontConfig::default()
        }
    }

    /// Open a file-backed storefront over this context's directory, with a
    /// recorder subscribed to its notifications.
    ///
    /// # Panics
    ///
    /// Panics if the storefront cannot be opened.
    #[must_use]
    pub fn open(&self) -> (Storefront, Arc<RecordingObserver>) {
        let notifier = Notifier::new();
        let recorder = Arc::new(RecordingObserver::new());
        notifier.subscribe(recorder.clone());
        let shop = Storefront::open_dir(self.config(), notifier)
            .unwrap_or_else(|e| panic!("failed to open storefront: {e}"));
        (shop, recorder)
    }

    /// Raw contents of a persisted key, if present.
    #[must_use]
    pub fn read_key(&self, key: &str) -> Option<serde_json::Value> {
        let raw = std::fs::read_to_string(self.dir.join(format!("{key}.json"))).ok()?;
        serde_json::from_str(&raw).ok()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}
