//! Checkout validation errors.

use thiserror::Error;

/// Errors raised while translating a checkout request for a provider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckoutError {
    /// Amount is NaN, infinite, or negative.
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    /// Amount does not fit the provider's integer representation.
    #[error("Amount out of range: {0}")]
    AmountOutOfRange(f64),

    /// Currency is not a three-letter ISO 4217 code.
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    /// A required field is empty.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Provider reported a status this layer does not know.
    #[error("Unknown session status: {0}")]
    UnknownStatus(String),
}
