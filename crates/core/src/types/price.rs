//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored in the currency's standard unit (dollars, not cents)
//! and serialize as JSON numbers so persisted snapshots stay readable.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul, Sub};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A monetary amount in US dollars.
///
/// Arithmetic is exact: `Price` wraps a [`Decimal`], so summing line totals
/// never drifts the way floating point does.
///
/// ## Examples
///
/// ```
/// use pocketshop_core::Price;
///
/// let unit = Price::from_cents(1999);
/// assert_eq!((unit * 3).to_string(), "$59.97");
/// assert!(Price::parse("-1").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from whole dollars.
    #[must_use]
    pub fn from_dollars(dollars: u32) -> Self {
        Self(Decimal::from(dollars))
    }

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// Parse a price from a string such as `"19.99"` or `"$19.99"`.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Invalid` if the input is not a number, or
    /// `PriceError::Negative` if it is below zero.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);
        let amount = digits
            .parse::<Decimal>()
            .map_err(|_| PriceError::Invalid(s.to_string()))?;
        Self::new(amount)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Round to whole cents using banker's rounding.
    #[must_use]
    pub fn round_cents(self) -> Self {
        Self(self.0.round_dp(2))
    }

    /// Multiply by a decimal rate (e.g. `0.10` for a ten percent share).
    #[must_use]
    pub fn scale(self, rate: Decimal) -> Self {
        Self(self.0 * rate)
    }

    /// Subtract, flooring at zero.
    #[must_use]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        if rhs.0 >= self.0 {
            Self::ZERO
        } else {
            Self(self.0 - rhs.0)
        }
    }

    /// Whole units after multiplying by `factor`, rounded down.
    ///
    /// Used for reward accrual (`floor(total × factor)`).
    #[must_use]
    pub fn floor_units(self, factor: u32) -> u64 {
        (self.0 * Decimal::from(factor)).floor().to_u64().unwrap_or(0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl std::str::FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.saturating_sub(rhs)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
