//! Read-only product catalog.
//!
//! The catalog ships with the crate as a JSON seed list and is validated
//! once when loaded. Listings are computed on demand and borrow from it.

mod query;

pub use query::{CatalogQuery, ProductSort};

use std::collections::HashSet;

use thiserror::Error;

use pocketshop_core::ProductId;

use crate::models::product::{Category, Product};

/// Bundled seed products.
const SEED_PRODUCTS: &str = include_str!("../../data/products.json");

/// Default number of products shown as trending.
pub const TRENDING_LIMIT: usize = 8;

/// Default number of related products.
pub const RELATED_LIMIT: usize = 4;

/// Errors that can occur while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),

    #[error("product {id} has rating {rating}, expected 0 to 5")]
    InvalidRating { id: ProductId, rating: f32 },

    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
}

/// The product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Load the bundled seed catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the bundled data is malformed.
    pub fn seeded() -> Result<Self, CatalogError> {
        Self::from_json(SEED_PRODUCTS)
    }

    /// Parse and validate a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` if the JSON does not decode.
    /// Returns `CatalogError::DuplicateId` if two products share an ID.
    /// Returns `CatalogError::InvalidRating` if a rating is outside 0..=5.
    /// Returns `CatalogError::NegativePrice` if a price is below zero.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::from_products(products)
    }

    /// Build a catalog from already-decoded products.
    ///
    /// # Errors
    ///
    /// See [`Catalog::from_json`].
    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            if !(0.0..=5.0).contains(&product.rating) {
                return Err(CatalogError::InvalidRating {
                    id: product.id,
                    rating: product.rating,
                });
            }
            if product.price.amount().is_sign_negative() && !product.price.amount().is_zero() {
                return Err(CatalogError::NegativePrice(product.id));
            }
        }
        tracing::debug!(products = products.len(), "Loaded catalog");
        Ok(Self { products })
    }

    /// Every product, in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Filter and sort the catalog.
    #[must_use]
    pub fn query(&self, query: &CatalogQuery) -> Vec<&Product> {
        let mut matches: Vec<&Product> =
            self.products.iter().filter(|p| query.matches(p)).collect();
        query.sort.apply(&mut matches);
        matches
    }

    /// The `limit` highest-rated products.
    #[must_use]
    pub fn trending(&self, limit: usize) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.products.iter().collect();
        ProductSort::Rating.apply(&mut products);
        products.truncate(limit);
        products
    }

    /// Up to `limit` other products in the same category, in catalog order.
    #[must_use]
    pub fn related(&self, product: &Product, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == product.category && p.id != product.id)
            .take(limit)
            .collect()
    }

    /// Categories that have at least one product, in menu order.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.products.iter().any(|p| p.category == *c))
            .collect()
    }
}
