//! Cart line types.

use serde::{Deserialize, Serialize};

use pocketshop_core::{Price, ProductId};

use super::product::Product;

/// Identity of a cart line: product plus selected variant options.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub id: ProductId,
    pub color: Option<String>,
    pub size: Option<String>,
}

impl LineKey {
    /// Build a key, treating blank options as "no selection".
    #[must_use]
    pub fn new(id: ProductId, color: Option<&str>, size: Option<&str>) -> Self {
        Self {
            id,
            color: normalize_option(color),
            size: normalize_option(size),
        }
    }
}

/// What the caller supplies when adding to the cart: a product snapshot
/// and its selected options, without a quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemInput {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub selected_color: Option<String>,
    pub selected_size: Option<String>,
}

impl CartItemInput {
    /// Snapshot a catalog product with the given options.
    #[must_use]
    pub fn from_product(product: &Product, color: Option<&str>, size: Option<&str>) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            selected_color: normalize_option(color),
            selected_size: normalize_option(size),
        }
    }

    /// The line this item would land on.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey::new(
            self.id,
            self.selected_color.as_deref(),
            self.selected_size.as_deref(),
        )
    }
}

/// One line in the cart.
///
/// Name, price and image are captured when the line is created and are not
/// refreshed from the catalog afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<String>,
}

impl CartLine {
    /// Create a line with quantity 1.
    #[must_use]
    pub fn from_input(item: CartItemInput) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            image: item.image,
            quantity: 1,
            selected_color: item.selected_color,
            selected_size: item.selected_size,
        }
    }

    /// Whether this line has the given identity.
    #[must_use]
    pub fn matches(&self, key: &LineKey) -> bool {
        self.id == key.id && self.selected_color == key.color && self.selected_size == key.size
    }

    /// Treat blank persisted options as "no selection".
    pub(crate) fn normalize_options(&mut self) {
        self.selected_color = normalize_option(self.selected_color.as_deref());
        self.selected_size = normalize_option(self.selected_size.as_deref());
    }

    /// This line's identity.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey::new(
            self.id,
            self.selected_color.as_deref(),
            self.selected_size.as_deref(),
        )
    }

    /// `price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }

    /// Variant label such as `"Blue / M"`, if any option is selected.
    #[must_use]
    pub fn variant_label(&self) -> Option<String> {
        match (&self.selected_color, &self.selected_size) {
            (Some(color), Some(size)) => Some(format!("{color} / {size}")),
            (Some(only), None) | (None, Some(only)) => Some(only.clone()),
            (None, None) => None,
        }
    }
}

fn normalize_option(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}
