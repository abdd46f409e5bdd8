//! Order domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pocketshop_core::{OrderId, OrderStatus, Price};

use super::cart::CartLine;

/// Shipping details submitted with an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl ShippingAddress {
    /// Name of the first required field that is blank, if any.
    ///
    /// Phone is optional; everything else must be filled in.
    #[must_use]
    pub fn first_missing_field(&self) -> Option<&'static str> {
        [
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zipCode", &self.zip_code),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }
}

/// A placed order.
///
/// Orders are immutable once created and are only ever appended to an
/// account's order list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// When the order was placed.
    pub date: DateTime<Utc>,
    /// Amount charged, after discount and shipping.
    pub total: Price,
    pub status: OrderStatus,
    /// Cart lines at the time of purchase.
    pub items: Vec<CartLine>,
    pub shipping_address: ShippingAddress,
}

impl Order {
    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }
}
