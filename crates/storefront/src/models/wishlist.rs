//! Wishlist entry type.

use serde::{Deserialize, Serialize};

use pocketshop_core::{Price, ProductId};

use super::product::{Category, Product};

/// A saved product with the fields the wishlist page displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub category: Category,
}

impl From<&Product> for WishlistItem {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            category: product.category,
        }
    }
}
