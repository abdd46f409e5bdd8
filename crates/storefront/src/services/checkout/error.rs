//! Checkout error types.

use thiserror::Error;

use crate::services::auth::AuthError;
use crate::storage::StorageError;

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nobody is signed in; the caller should send the shopper to login.
    #[error("login required to check out")]
    LoginRequired,

    /// There is nothing to buy.
    #[error("cart is empty")]
    EmptyCart,

    /// A required shipping field is blank.
    #[error("missing shipping field: {0}")]
    MissingShippingField(&'static str),

    /// Account update failed.
    #[error("account error: {0}")]
    Auth(#[from] AuthError),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
