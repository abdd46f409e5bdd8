//! Authentication error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required field was left blank.
    #[error("all fields are required")]
    MissingFields,

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] pocketshop_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Message safe to show the person at the keyboard.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingFields => "All fields are required".to_string(),
            Self::InvalidEmail(_) => "Invalid email format".to_string(),
            Self::InvalidCredentials => "Invalid credentials".to_string(),
            Self::UserAlreadyExists => "User already exists".to_string(),
            Self::WeakPassword(msg) => msg.clone(),
            Self::Storage(_) | Self::PasswordHash => "Something went wrong, please try again".to_string(),
        }
    }
}
