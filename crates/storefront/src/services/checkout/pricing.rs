//! Checkout pricing: shipping, coupon discount and loyalty accrual.
//!
//! Everything here is a pure function of the cart subtotal, an optional
//! coupon code and a [`CheckoutConfig`].

use std::time::Duration;

use rust_decimal::Decimal;

use pocketshop_core::Price;

/// Tunable checkout constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// Subtotals strictly above this ship free.
    pub free_shipping_threshold: Price,
    /// Shipping charged at or below the threshold.
    pub flat_shipping_fee: Price,
    /// The one recognized coupon, compared case-insensitively.
    pub coupon_code: String,
    /// Fraction of the subtotal the coupon takes off.
    pub coupon_rate: Decimal,
    /// Loyalty points per dollar of the order total.
    pub points_per_dollar: u32,
    /// Simulated payment processing time.
    pub payment_delay: Duration,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Price::from_dollars(50),
            flat_shipping_fee: Price::from_dollars(10),
            coupon_code: "SAVE10".to_string(),
            coupon_rate: Decimal::new(10, 2),
            points_per_dollar: 10,
            payment_delay: Duration::from_secs(2),
        }
    }
}

impl CheckoutConfig {
    /// Shipping for a subtotal: free above the threshold, flat otherwise.
    #[must_use]
    pub fn shipping_for(&self, subtotal: Price) -> Price {
        if subtotal > self.free_shipping_threshold {
            Price::ZERO
        } else {
            self.flat_shipping_fee
        }
    }

    /// Whether `code` is the recognized coupon.
    #[must_use]
    pub fn recognizes(&self, code: &str) -> bool {
        code.trim().eq_ignore_ascii_case(&self.coupon_code)
    }
}

/// What happened to the coupon the shopper entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CouponOutcome {
    /// No code was entered.
    NotProvided,
    Applied { code: String },
    Rejected { code: String },
}

/// Derived order totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub subtotal: Price,
    pub discount: Price,
    pub shipping: Price,
    pub total: Price,
    pub coupon: CouponOutcome,
}

impl OrderSummary {
    /// Price an order.
    ///
    /// `total = subtotal − discount + shipping`, where shipping is decided
    /// on the pre-discount subtotal.
    #[must_use]
    pub fn compute(subtotal: Price, coupon: Option<&str>, config: &CheckoutConfig) -> Self {
        let coupon = match coupon.map(str::trim).filter(|c| !c.is_empty()) {
            None => CouponOutcome::NotProvided,
            Some(code) if config.recognizes(code) => CouponOutcome::Applied {
                code: code.to_ascii_uppercase(),
            },
            Some(code) => CouponOutcome::Rejected {
                code: code.to_string(),
            },
        };

        let discount = match coupon {
            CouponOutcome::Applied { .. } => subtotal.scale(config.coupon_rate).round_cents(),
            CouponOutcome::NotProvided | CouponOutcome::Rejected { .. } => Price::ZERO,
        };
        let shipping = config.shipping_for(subtotal);
        let total = subtotal - discount + shipping;

        Self {
            subtotal,
            discount,
            shipping,
            total,
            coupon,
        }
    }

    /// Loyalty points this order earns: `floor(total × points_per_dollar)`.
    #[must_use]
    pub fn loyalty_points(&self, config: &CheckoutConfig) -> u64 {
        self.total.floor_units(config.points_per_dollar)
    }
}
