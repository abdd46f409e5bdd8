//! Catalog browsing commands.

use std::io::{self, Write};

use pocketshop_core::{Price, ProductId};
use pocketshop_storefront::{Result, Storefront};
use pocketshop_storefront::catalog::{CatalogQuery, ProductSort, RELATED_LIMIT};
use pocketshop_storefront::models::product::{Category, Product};

use super::product;

/// Filters accepted by `catalog list`.
#[derive(Debug, Default)]
pub struct ListFilters {
    pub categories: Vec<Category>,
    pub search: Option<String>,
    pub min: Option<Price>,
    pub max: Option<Price>,
    pub sort: String,
}

impl ListFilters {
    fn to_query(&self) -> CatalogQuery {
        let mut query = self
            .categories
            .iter()
            .fold(CatalogQuery::new(), |q, c| q.category(*c))
            .price_range(self.min, self.max)
            .sort(ProductSort::parse(&self.sort));
        if let Some(search) = &self.search {
            query = query.search(search.as_str());
        }
        query
    }
}

/// List products matching `filters`.
///
/// # Errors
///
/// Returns an I/O error if the output cannot be written.
pub fn list(shop: &Storefront, filters: &ListFilters, out: &mut impl Write) -> io::Result<()> {
    let products = shop.catalog().query(&filters.to_query());
    writeln!(out, "{} products found", products.len())?;
    for product in products {
        write_row(out, product)?;
    }
    Ok(())
}

/// Show the top-rated products.
///
/// # Errors
///
/// Returns an I/O error if the output cannot be written.
pub fn trending(shop: &Storefront, limit: usize, out: &mut impl Write) -> io::Result<()> {
    for product in shop.catalog().trending(limit) {
        write_row(out, product)?;
    }
    Ok(())
}

/// Show one product in detail, followed by related products.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the ID is not in the catalog, or
/// `AppError::Output` if the output cannot be written.
pub fn show(shop: &Storefront, id: ProductId, out: &mut impl Write) -> Result<()> {
    let product = product(shop, id)?;

    writeln!(out, "{} (#{})", product.name, product.id)?;
    writeln!(out, "  Category: {}", product.category)?;
    match product.original_price.filter(|_| product.is_on_sale()) {
        Some(original) => writeln!(
            out,
            "  Price:    {} (was {}, {}% off)",
            product.price,
            original,
            product.discount.unwrap_or_default()
        )?,
        None => writeln!(out, "  Price:    {}", product.price)?,
    }
    writeln!(
        out,
        "  Rating:   {:.1} ({} reviews)",
        product.rating, product.reviews
    )?;
    writeln!(
        out,
        "  Stock:    {}",
        if product.in_stock { "in stock" } else { "out of stock" }
    )?;
    if !product.colors.is_empty() {
        writeln!(out, "  Colors:   {}", product.colors.join(", "))?;
    }
    if !product.sizes.is_empty() {
        writeln!(out, "  Sizes:    {}", product.sizes.join(", "))?;
    }
    if !product.description.is_empty() {
        writeln!(out, "\n  {}", product.description)?;
    }
    for feature in &product.features {
        writeln!(out, "  - {feature}")?;
    }

    let related = shop.catalog().related(&product, RELATED_LIMIT);
    if !related.is_empty() {
        writeln!(out, "\nYou may also like:")?;
        for product in related {
            write_row(out, product)?;
        }
    }
    Ok(())
}

fn write_row(out: &mut impl Write, product: &Product) -> io::Result<()> {
    writeln!(
        out,
        "{:>4}  {:<38} {:<12} {:>9}  {:.1}",
        product.id.to_string(),
        product.name,
        product.category.as_str(),
        product.price.to_string(),
        product.rating
    )
}
