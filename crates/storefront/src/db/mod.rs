//! Repositories over the key-value store.
//!
//! Stores that keep an in-memory copy (cart, wishlist) talk to
//! [`crate::storage`] directly. The repositories here cover records with
//! more than one key or a key derived from an ID:
//!
//! - `users` / `currentUser` - Account directory and active session
//! - `orders_{accountId}` - Per-account order history

pub mod orders;
pub mod users;

pub use orders::OrderRepository;
pub use users::UserRepository;
