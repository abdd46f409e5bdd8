//! Pocketshop storefront library.
//!
//! Catalog browsing, a cart, a wishlist, local accounts and checkout, all
//! persisted through an injected key-value store. Front ends drive it
//! through [`state::Storefront`] or the individual stores.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;

pub use error::{AppError, Result};
pub use state::Storefront;
