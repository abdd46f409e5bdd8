//! Catalog filters and sort order.

use pocketshop_core::Price;

use crate::models::product::{Category, Product};

/// Catalog sort order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ProductSort {
    /// Catalog order.
    #[default]
    Relevance,
    PriceLowToHigh,
    PriceHighToLow,
    /// Highest rated first.
    Rating,
    /// Highest ID first.
    Newest,
}

impl ProductSort {
    /// Parse from a sort parameter value. Unknown values fall back to
    /// relevance.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "price-low" | "price_asc" => Self::PriceLowToHigh,
            "price-high" | "price_desc" => Self::PriceHighToLow,
            "rating" => Self::Rating,
            "newest" => Self::Newest,
            _ => Self::Relevance,
        }
    }

    /// Convert to a sort parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::PriceLowToHigh => "price-low",
            Self::PriceHighToLow => "price-high",
            Self::Rating => "rating",
            Self::Newest => "newest",
        }
    }

    /// Stable in-place sort.
    pub(crate) fn apply(self, products: &mut [&Product]) {
        match self {
            Self::Relevance => {}
            Self::PriceLowToHigh => products.sort_by_key(|p| p.price),
            Self::PriceHighToLow => products.sort_by(|a, b| b.price.cmp(&a.price)),
            Self::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            Self::Newest => products.sort_by(|a, b| b.id.cmp(&a.id)),
        }
    }
}

/// Product listing filters.
///
/// Empty `categories` means every category. Price bounds are inclusive.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub categories: Vec<Category>,
    /// Case-insensitive substring of the name or category.
    pub search: Option<String>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub sort: ProductSort,
}

impl CatalogQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
        self
    }

    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.search = (!text.trim().is_empty()).then_some(text);
        self
    }

    #[must_use]
    pub const fn price_range(mut self, min: Option<Price>, max: Option<Price>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    #[must_use]
    pub const fn sort(mut self, sort: ProductSort) -> Self {
        self.sort = sort;
        self
    }

    /// Whether `product` passes every filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if !self.categories.is_empty() && !self.categories.contains(&product.category) {
            return false;
        }

        if let Some(search) = &self.search {
            let needle = search.trim().to_lowercase();
            let in_name = product.name.to_lowercase().contains(&needle);
            let in_category = product.category.as_str().to_lowercase().contains(&needle);
            if !in_name && !in_category {
                return false;
            }
        }

        self.min_price.is_none_or(|min| product.price >= min)
            && self.max_price.is_none_or(|max| product.price <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parse_round_trips_known_values() {
        for sort in [
            ProductSort::Relevance,
            ProductSort::PriceLowToHigh,
            ProductSort::PriceHighToLow,
            ProductSort::Rating,
            ProductSort::Newest,
        ] {
            assert_eq!(ProductSort::parse(sort.as_str()), sort);
        }
        assert_eq!(ProductSort::parse("bogus"), ProductSort::Relevance);
    }

    #[test]
    fn test_blank_search_is_dropped() {
        assert_eq!(CatalogQuery::new().search("  ").search, None);
    }

    #[test]
    fn test_category_is_not_duplicated() {
        let query = CatalogQuery::new()
            .category(Category::Men)
            .category(Category::Men);
        assert_eq!(query.categories, vec![Category::Men]);
    }
}
