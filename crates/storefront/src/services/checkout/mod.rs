//! Checkout: pricing the cart and turning it into an order.
//!
//! # Order flow
//!
//! 1. The shopper must be signed in.
//! 2. The cart must hold at least one line.
//! 3. Required shipping fields must be filled in.
//! 4. Totals are computed from the cart subtotal and coupon.
//! 5. Payment is simulated with a fixed delay that always succeeds.
//! 6. The order is appended to the account's order list, loyalty points are
//!    credited and the cart is emptied.
//!
//! Steps 6 write to three independent keys; there is no transaction across
//! them.

mod error;
mod pricing;

pub use error::CheckoutError;
pub use pricing::{CheckoutConfig, CouponOutcome, OrderSummary};

use chrono::Utc;
use tracing::instrument;

use pocketshop_core::{OrderId, OrderStatus};

use crate::db::orders::OrderRepository;
use crate::events::{CheckoutEvent, Notifier};
use crate::models::order::{Order, ShippingAddress};
use crate::services::auth::AccountStore;
use crate::services::cart::CartStore;
use crate::storage::KeyValueStore;

/// A successfully placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    pub order: Order,
    pub summary: OrderSummary,
    pub points_earned: u64,
}

/// Checkout over a cart and the account store.
///
/// Borrows both stores exclusively for its lifetime, so nothing else can
/// mutate the cart while a payment is pending.
pub struct CheckoutService<'a> {
    cart: &'a mut CartStore,
    accounts: &'a mut AccountStore,
    orders: OrderRepository<'a>,
    config: &'a CheckoutConfig,
    notifier: Notifier,
}

impl<'a> CheckoutService<'a> {
    /// Create a checkout over the given stores.
    #[must_use]
    pub fn new(
        cart: &'a mut CartStore,
        accounts: &'a mut AccountStore,
        store: &'a dyn KeyValueStore,
        config: &'a CheckoutConfig,
        notifier: Notifier,
    ) -> Self {
        Self {
            cart,
            accounts,
            orders: OrderRepository::new(store),
            config,
            notifier,
        }
    }

    /// Price the current cart with an optional coupon.
    ///
    /// Emits `CouponApplied` or `CouponRejected` when a code was entered.
    pub fn quote(&self, coupon: Option<&str>) -> OrderSummary {
        let summary = OrderSummary::compute(self.cart.total(), coupon, self.config);
        match &summary.coupon {
            CouponOutcome::Applied { code } => {
                self.notifier.emit(CheckoutEvent::CouponApplied {
                    code: code.clone(),
                    discount: summary.discount,
                });
            }
            CouponOutcome::Rejected { code } => {
                self.notifier
                    .emit(CheckoutEvent::CouponRejected { code: code.clone() });
            }
            CouponOutcome::NotProvided => {}
        }
        summary
    }

    /// Place an order for the current cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::LoginRequired` if nobody is signed in.
    /// Returns `CheckoutError::EmptyCart` if the cart has no lines.
    /// Returns `CheckoutError::MissingShippingField` if a required address
    /// field is blank.
    /// Returns `CheckoutError::Storage` or `CheckoutError::Auth` if a write
    /// fails after payment.
    #[instrument(skip(self, shipping_address))]
    pub async fn place_order(
        &mut self,
        shipping_address: ShippingAddress,
        coupon: Option<&str>,
    ) -> Result<OrderReceipt, CheckoutError> {
        let Some(account_id) = self.accounts.current().map(|account| account.id) else {
            self.notifier.emit(CheckoutEvent::LoginRequired);
            return Err(CheckoutError::LoginRequired);
        };

        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        if let Some(field) = shipping_address.first_missing_field() {
            return Err(CheckoutError::MissingShippingField(field));
        }

        let summary = self.quote(coupon);

        tracing::debug!(delay_ms = self.config.payment_delay.as_millis(), "Processing payment");
        tokio::time::sleep(self.config.payment_delay).await;

        let order = Order {
            id: OrderId::generate(),
            date: Utc::now(),
            total: summary.total,
            status: OrderStatus::Processing,
            items: self.cart.lines().to_vec(),
            shipping_address,
        };
        self.orders.append(&account_id, &order)?;

        let points_earned = summary.loyalty_points(self.config);
        self.accounts.add_loyalty_points(points_earned)?;
        self.cart.clear()?;

        tracing::info!(
            order_id = %order.id,
            %account_id,
            total = %order.total,
            points_earned,
            "Order placed"
        );
        self.notifier.emit(CheckoutEvent::OrderPlaced {
            order_id: order.id,
            total: order.total,
            points_earned,
        });

        Ok(OrderReceipt {
            order,
            summary,
            points_earned,
        })
    }

    /// Orders placed by the signed-in account, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::LoginRequired` if nobody is signed in.
    /// Returns `CheckoutError::Storage` if the order list cannot be read.
    pub fn order_history(&self) -> Result<Vec<Order>, CheckoutError> {
        let account = self.accounts.current().ok_or(CheckoutError::LoginRequired)?;
        Ok(self.orders.list(&account.id)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use pocketshop_core::{Price, ProductId};

    use super::*;
    use crate::events::{RecordingObserver, StoreEvent};
    use crate::models::cart::CartItemInput;
    use crate::storage::{MemoryStore, keys};

    struct Fixture {
        store: Arc<MemoryStore>,
        notifier: Notifier,
        recorder: Arc<RecordingObserver>,
        cart: CartStore,
        accounts: AccountStore,
        config: CheckoutConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let store = Arc::new(MemoryStore::new());
            let notifier = Notifier::new();
            let recorder = Arc::new(RecordingObserver::new());
            notifier.subscribe(recorder.clone());
            let cart = CartStore::load(store.clone(), notifier.clone()).unwrap();
            let accounts = AccountStore::load(store.clone(), notifier.clone()).unwrap();
            Self {
                store,
                notifier,
                recorder,
                cart,
                accounts,
                config: CheckoutConfig::default(),
            }
        }

        fn checkout(&mut self) -> CheckoutService<'_> {
            CheckoutService::new(
                &mut self.cart,
                &mut self.accounts,
                self.store.as_ref(),
                &self.config,
                self.notifier.clone(),
            )
        }

        fn add(&mut self, id: i32, dollars: u32) {
            self.cart
                .add_item(CartItemInput {
                    id: ProductId::new(id),
                    name: format!("Product {id}"),
                    price: Price::from_dollars(dollars),
                    image: format!("{id}.jpg"),
                    selected_color: None,
                    selected_size: None,
                })
                .unwrap();
        }
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: String::new(),
            address: "12 Analytical Way".to_string(),
            city: "London".to_string(),
            state: "LDN".to_string(),
            zip_code: "N1 9GU".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_awards_points_and_clears_cart() {
        let mut fx = Fixture::new();
        fx.accounts.register("a@b.com", "abcdef", "A").unwrap();
        fx.add(1, 20);
        fx.add(2, 40);

        let receipt = fx.checkout().place_order(address(), None).await.unwrap();

        assert_eq!(receipt.summary.subtotal, Price::from_dollars(60));
        assert_eq!(receipt.summary.shipping, Price::ZERO);
        assert_eq!(receipt.points_earned, 600);
        assert_eq!(receipt.order.status, OrderStatus::Processing);
        assert_eq!(receipt.order.items.len(), 2);

        assert!(fx.cart.is_empty());
        assert!(!fx.store.contains(keys::CART));
        assert_eq!(fx.accounts.current().unwrap().loyalty_points, 600);
        assert!(matches!(
            fx.recorder.events().last(),
            Some(StoreEvent::Checkout(CheckoutEvent::OrderPlaced {
                points_earned: 600,
                ..
            }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_is_appended_to_history() {
        let mut fx = Fixture::new();
        fx.accounts.register("a@b.com", "abcdef", "A").unwrap();

        fx.add(1, 10);
        let first = fx.checkout().place_order(address(), None).await.unwrap();
        fx.add(2, 70);
        let second = fx
            .checkout()
            .place_order(address(), Some("save10"))
            .await
            .unwrap();

        let history = fx.checkout().order_history().unwrap();
        assert_eq!(history, vec![first.order, second.order.clone()]);
        // 70 - 7 discount, free shipping
        assert_eq!(second.order.total, Price::from_dollars(63));
        // 20 * 10 + 63 * 10
        assert_eq!(fx.accounts.current().unwrap().loyalty_points, 830);
    }

    #[tokio::test(start_paused = true)]
    async fn test_requires_login() {
        let mut fx = Fixture::new();
        fx.add(1, 60);

        let result = fx.checkout().place_order(address(), None).await;

        assert!(matches!(result, Err(CheckoutError::LoginRequired)));
        assert_eq!(fx.cart.count(), 1);
        assert!(
            fx.recorder
                .events()
                .contains(&StoreEvent::Checkout(CheckoutEvent::LoginRequired))
        );
        assert!(matches!(
            fx.checkout().order_history(),
            Err(CheckoutError::LoginRequired)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejects_empty_cart_and_missing_fields() {
        let mut fx = Fixture::new();
        let account = fx.accounts.register("a@b.com", "abcdef", "A").unwrap();

        let empty = fx.checkout().place_order(address(), None).await;
        assert!(matches!(empty, Err(CheckoutError::EmptyCart)));

        fx.add(1, 60);
        let incomplete = ShippingAddress {
            city: "  ".to_string(),
            ..address()
        };
        let result = fx.checkout().place_order(incomplete, None).await;
        assert!(matches!(
            result,
            Err(CheckoutError::MissingShippingField("city"))
        ));

        assert_eq!(fx.cart.count(), 1);
        assert!(!fx.store.contains(&keys::orders(&account.id)));
    }

    #[test]
    fn test_quote_reports_coupon() {
        let mut fx = Fixture::new();
        fx.add(1, 100);

        let summary = fx.checkout().quote(Some("BOGUS"));
        assert_eq!(summary.discount, Price::ZERO);
        assert_eq!(
            fx.recorder.events().last(),
            Some(&StoreEvent::Checkout(CheckoutEvent::CouponRejected {
                code: "BOGUS".to_string()
            }))
        );

        let summary = fx.checkout().quote(Some("save10"));
        assert_eq!(summary.total, Price::from_dollars(90));
    }
}
