//! Stateful storefront services.
//!
//! # Services
//!
//! - `cart` - Cart lines keyed by product and selected options
//! - `wishlist` - Saved products, unique by ID
//! - `auth` - Local account directory, password login and the active session
//! - `checkout` - Pricing and order placement over the cart and account stores
//!
//! Every store is loaded from an injected `KeyValueStore` and writes through
//! to it on each mutation.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod wishlist;

pub use auth::{AccountStore, AuthError};
pub use cart::{AddOutcome, CartStore};
pub use checkout::{
    CheckoutConfig, CheckoutError, CheckoutService, CouponOutcome, OrderReceipt, OrderSummary,
};
pub use wishlist::WishlistStore;
