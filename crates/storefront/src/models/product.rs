//! Catalog product types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use pocketshop_core::{Price, ProductId};

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Men,
    Women,
    Electronics,
    Home,
}

impl Category {
    /// Every category, in menu order.
    pub const ALL: [Self; 4] = [Self::Men, Self::Women, Self::Electronics, Self::Home];

    /// Display name, identical to the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Men => "Men",
            Self::Women => "Women",
            Self::Electronics => "Electronics",
            Self::Home => "Home",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid category: {s}"))
    }
}

/// A catalog product.
///
/// Products are loaded once from seed data and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    pub price: Price,
    /// Pre-discount price, when the product is on sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    /// Discount percentage shown on the sale badge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<u8>,
    /// Average review score, 0 to 5.
    pub rating: f32,
    pub reviews: u32,
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub in_stock: bool,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Product {
    /// Whether `color` is one of this product's options.
    ///
    /// Products without color options accept no color.
    #[must_use]
    pub fn offers_color(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c.eq_ignore_ascii_case(color))
    }

    /// Whether `size` is one of this product's options.
    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s.eq_ignore_ascii_case(size))
    }

    /// Whether the product is marked down from an original price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.original_price.is_some_and(|original| original > self.price)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str_is_case_insensitive() {
        assert_eq!("electronics".parse::<Category>().unwrap(), Category::Electronics);
        assert_eq!(" Men ".parse::<Category>().unwrap(), Category::Men);
        assert!("Toys".parse::<Category>().is_err());
    }

    #[test]
    fn test_product_deserializes_camel_case() {
        let json = r#"{
            "id": 9,
            "name": "Desk Lamp",
            "category": "Home",
            "price": 39.99,
            "originalPrice": 49.99,
            "discount": 20,
            "rating": 4.4,
            "reviews": 120,
            "image": "lamp.jpg",
            "inStock": true,
            "colors": ["Black", "White"]
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id, ProductId::new(9));
        assert_eq!(product.category, Category::Home);
        assert!(product.is_on_sale());
        assert!(product.offers_color("black"));
        assert!(!product.offers_size("M"));
        assert!(product.features.is_empty());
    }
}
