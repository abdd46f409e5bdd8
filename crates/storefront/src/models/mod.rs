//! Domain models for the storefront.
//!
//! All persisted models serialize with camelCase field names so stored
//! blobs stay readable and stable across releases.

pub mod account;
pub mod cart;
pub mod order;
pub mod product;
pub mod wishlist;

pub use account::{Account, DirectoryRecord, ProfileUpdate};
pub use cart::{CartItemInput, CartLine, LineKey};
pub use order::{Order, ShippingAddress};
pub use product::{Category, Product};
pub use wishlist::WishlistItem;
