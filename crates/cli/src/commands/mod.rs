//! Command implementations.
//!
//! Each command writes its report to the supplied writer. Store
//! notifications are printed separately by [`ConsoleObserver`].

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod wishlist;

use std::io::Write;

use pocketshop_core::ProductId;
use pocketshop_storefront::{AppError, Result, Storefront};
use pocketshop_storefront::events::{Observer, Severity, StoreEvent};
use pocketshop_storefront::models::product::Product;

/// Prints every store notification on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleObserver;

impl Observer for ConsoleObserver {
    fn notify(&self, event: &StoreEvent) {
        let marker = match event.severity() {
            Severity::Success => "+",
            Severity::Info => "i",
            Severity::Error => "!",
        };
        // A closed stdout is not worth failing a command over
        let _ = writeln!(std::io::stdout(), "[{marker}] {}", event.message());
    }
}

/// Look up a catalog product.
fn product(shop: &Storefront, id: ProductId) -> Result<Product> {
    shop.catalog()
        .get(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Product {id}")))
}
