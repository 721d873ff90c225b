//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Checkout-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// Price text could not be turned into minor units
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The payment processor rejected or failed the call
    #[error("failed to create the session: {0}")]
    Upstream(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl PaymentError {
    /// Whether the failure was caused by the caller's input rather than the processor
    pub fn is_client_error(&self) -> bool {
        matches!(self, PaymentError::InvalidAmount(_))
    }
}

impl From<stripe::StripeError> for PaymentError {
    fn from(err: stripe::StripeError) -> Self {
        PaymentError::Upstream(err.to_string())
    }
}
