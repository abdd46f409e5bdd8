//! End-to-end checkout: register, fill the cart, place orders, read history.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use pocketshop_core::{OrderStatus, Price, ProductId};
use pocketshop_integration_tests::TestContext;
use pocketshop_storefront::events::{CheckoutEvent, StoreEvent};
use pocketshop_storefront::models::order::ShippingAddress;
use pocketshop_storefront::services::CheckoutError;
use pocketshop_storefront::storage::keys;

fn address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Grace Hopper".to_string(),
        email: "grace@example.com".to_string(),
        phone: "555-0100".to_string(),
        address: "1 Compiler Court".to_string(),
        city: "Arlington".to_string(),
        state: "VA".to_string(),
        zip_code: "22201".to_string(),
    }
}

// =============================================================================
// Happy Path
// =============================================================================

#[tokio::test]
async fn test_full_checkout_with_coupon() {
    let ctx = TestContext::new();
    let (mut shop, recorder) = ctx.open();

    shop.accounts_mut()
        .register("grace@example.com", "cobol59", "Grace")
        .unwrap();

    // Headphones (299.99) twice, plus a hub (29.99)
    let headphones = shop.catalog().get(ProductId::new(9)).unwrap().clone();
    let hub = shop.catalog().get(ProductId::new(12)).unwrap().clone();
    shop.cart_mut().add_line(&headphones, Some("Black"), None).unwrap();
    shop.cart_mut().add_line(&headphones, Some("Black"), None).unwrap();
    shop.cart_mut().add_line(&hub, None, None).unwrap();
    assert_eq!(shop.cart().count(), 3);

    let receipt = shop
        .checkout()
        .place_order(address(), Some("Save10"))
        .await
        .unwrap();

    // 629.97 - 63.00 (rounded) + free shipping
    assert_eq!(receipt.summary.subtotal, Price::from_cents(62997));
    assert_eq!(receipt.summary.discount, Price::from_cents(6300));
    assert_eq!(receipt.summary.shipping, Price::ZERO);
    assert_eq!(receipt.order.total, Price::from_cents(56697));
    assert_eq!(receipt.points_earned, 5669);
    assert_eq!(receipt.order.status, OrderStatus::Processing);
    assert_eq!(receipt.order.item_count(), 3);

    assert!(shop.cart().is_empty());
    assert_eq!(shop.accounts().current().unwrap().loyalty_points, 5669);

    let events = recorder.events();
    assert!(events.contains(&StoreEvent::Checkout(CheckoutEvent::CouponApplied {
        code: "SAVE10".to_string(),
        discount: Price::from_cents(6300),
    })));
    assert_eq!(
        events.last().map(StoreEvent::message),
        Some("Order placed! You earned 5669 loyalty points!".to_string())
    );
}

#[tokio::test]
async fn test_small_order_pays_shipping() {
    let ctx = TestContext::new();
    let (mut shop, _) = ctx.open();
    shop.accounts_mut()
        .register("grace@example.com", "cobol59", "Grace")
        .unwrap();

    let candles = shop.catalog().get(ProductId::new(15)).unwrap().clone();
    shop.cart_mut().add_line(&candles, None, None).unwrap();

    let receipt = shop.checkout().place_order(address(), None).await.unwrap();

    // 24.99 + 10.00
    assert_eq!(receipt.order.total, Price::from_cents(3499));
    assert_eq!(receipt.points_earned, 349);
}

// =============================================================================
// Rejections
// =============================================================================

#[tokio::test]
async fn test_checkout_requires_session() {
    let ctx = TestContext::new();
    let (mut shop, _) = ctx.open();

    let lamp = shop.catalog().get(ProductId::new(13)).unwrap().clone();
    shop.cart_mut().add_line(&lamp, Some("Sage"), None).unwrap();

    let result = shop.checkout().place_order(address(), None).await;
    assert!(matches!(result, Err(CheckoutError::LoginRequired)));
    assert_eq!(shop.cart().count(), 1);
}

#[tokio::test]
async fn test_orders_are_per_account() {
    let ctx = TestContext::new();
    let (mut shop, _) = ctx.open();
    let lamp = shop.catalog().get(ProductId::new(13)).unwrap().clone();

    let grace = shop
        .accounts_mut()
        .register("grace@example.com", "cobol59", "Grace")
        .unwrap();
    shop.cart_mut().add_line(&lamp, None, None).unwrap();
    shop.checkout().place_order(address(), None).await.unwrap();
    shop.accounts_mut().logout().unwrap();

    let alan = shop
        .accounts_mut()
        .register("alan@example.com", "enigma", "Alan")
        .unwrap();
    assert!(shop.checkout().order_history().unwrap().is_empty());

    assert!(ctx.read_key(&keys::orders(&grace.id)).is_some());
    assert!(ctx.read_key(&keys::orders(&alan.id)).is_none());

    shop.accounts_mut().logout().unwrap();
    shop.accounts_mut()
        .login("grace@example.com", "cobol59")
        .unwrap();
    assert_eq!(shop.checkout().order_history().unwrap().len(), 1);
}
