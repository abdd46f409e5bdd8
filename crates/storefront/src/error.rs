//! Unified error handling.
//!
//! Provides a unified `AppError` for front ends that drive several stores
//! at once. Each variant maps to a short message that is safe to show to a
//! shopper.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Persistence operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Catalog data is invalid.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration is invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The operation needs a signed-in account.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from the caller.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Writing command output failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl AppError {
    /// Message suitable for showing to the shopper.
    ///
    /// Storage and catalog details are not exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage(_) | Self::Catalog(_) => "Something went wrong, please try again".to_string(),
            Self::Auth(err) => err.user_message(),
            Self::Checkout(err) => match err {
                CheckoutError::LoginRequired => "Please login to complete checkout".to_string(),
                CheckoutError::EmptyCart => "Your cart is empty".to_string(),
                CheckoutError::MissingShippingField(field) => {
                    format!("Please fill in the {field} field")
                }
                CheckoutError::Auth(err) => err.user_message(),
                CheckoutError::Storage(_) => "Something went wrong, please try again".to_string(),
            },
            Self::Config(err) => err.to_string(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::Unauthorized(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::Output(_) => "Could not write output".to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
