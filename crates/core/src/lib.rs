//! Pocketshop Core - Shared types library.
//!
//! This crate provides common types used across all Pocketshop components:
//! - `storefront` - Catalog, cart, wishlist, account and checkout stores
//! - `cli` - Command-line front end over a file-backed store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no persistence, no clocks.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, credentials and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
