//! Cart rules exercised over the bundled catalog.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use pocketshop_core::{Price, ProductId};
use pocketshop_integration_tests::TestContext;
use pocketshop_storefront::catalog::{CatalogQuery, ProductSort};
use pocketshop_storefront::events::{CartEvent, StoreEvent};
use pocketshop_storefront::models::product::Category;

#[test]
fn test_count_and_total_over_distinct_lines() {
    let ctx = TestContext::new();
    let (mut shop, _) = ctx.open();

    let products: Vec<_> = shop
        .catalog()
        .query(&CatalogQuery::new().category(Category::Home))
        .into_iter()
        .cloned()
        .collect();
    for product in &products {
        shop.cart_mut().add_line(product, None, None).unwrap();
    }

    let expected: Price = products.iter().map(|p| p.price).sum();
    assert_eq!(shop.cart().count(), u64::try_from(products.len()).unwrap());
    assert_eq!(shop.cart().total(), expected);
}

#[test]
fn test_repeat_add_increments_single_line() {
    let ctx = TestContext::new();
    let (mut shop, recorder) = ctx.open();
    let watch = shop.catalog().get(ProductId::new(10)).unwrap().clone();

    for _ in 0..3 {
        shop.cart_mut().add_line(&watch, Some("Black"), Some("44mm")).unwrap();
    }

    assert_eq!(shop.cart().lines().len(), 1);
    assert_eq!(shop.cart().count(), 3);
    assert_eq!(
        recorder.events().last(),
        Some(&StoreEvent::Cart(CartEvent::QuantityUpdated {
            product_id: ProductId::new(10),
            quantity: 3
        }))
    );
}

#[test]
fn test_set_quantity_overwrites_and_zero_removes() {
    let ctx = TestContext::new();
    let (mut shop, _) = ctx.open();
    let speaker = shop.catalog().get(ProductId::new(11)).unwrap().clone();
    shop.cart_mut().add_line(&speaker, None, None).unwrap();

    shop.cart_mut().set_quantity(ProductId::new(11), 7).unwrap();
    assert_eq!(shop.cart().count(), 7);

    shop.cart_mut().set_quantity(ProductId::new(11), 0).unwrap();
    assert!(shop.cart().is_empty());
}

#[test]
fn test_cheapest_first_listing_feeds_cart() {
    let ctx = TestContext::new();
    let (mut shop, _) = ctx.open();

    let cheapest = shop
        .catalog()
        .query(&CatalogQuery::new().sort(ProductSort::PriceLowToHigh))
        .first()
        .map(|p| (*p).clone())
        .unwrap();
    assert_eq!(cheapest.id, ProductId::new(15));

    shop.cart_mut().add_line(&cheapest, None, None).unwrap();
    assert_eq!(shop.cart().total(), cheapest.price);
}
