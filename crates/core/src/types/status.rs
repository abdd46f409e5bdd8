//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Orders are created as `Processing` and nothing in this system moves them
/// on: there is no cancellation, refund or fulfillment transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Processing,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Processing => write!(f, "Processing"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Processing" => Ok(Self::Processing),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}
