// src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Billing provider error: {0}")]
    ProviderError(String),

    #[error("Failed to encode record: {0}")]
    EncodingError(#[source] serde_json::Error),

    #[error("Failed to decode record: {0}")]
    DecodingError(#[source] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl From<stripe::StripeError> for AppError {
    fn from(err: stripe::StripeError) -> Self {
        AppError::ProviderError(format!("Stripe error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
