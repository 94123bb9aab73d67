//! Webhook error types.
//!
//! Every variant is a per-request rejection: the caller answers the provider
//! with the mapped status code and stops processing the payload.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur while authenticating or decoding an inbound webhook.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The request carried no signature header.
    #[error("Missing signature header: {0}")]
    MissingSignature(String),

    /// Webhook timestamp is outside the acceptable window (5 minutes).
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Event timestamp is in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Failed to parse webhook payload or signature header.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Required field missing from webhook payload.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// No verification secret is configured for the provider.
    #[error("Webhook verification not configured for provider {0}")]
    NotConfigured(String),
}

impl WebhookError {
    /// Returns true when the failure is about authenticity rather than shape.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            WebhookError::InvalidSignature
                | WebhookError::MissingSignature(_)
                | WebhookError::TimestampOutOfRange
        )
    }

    /// Maps the error to the HTTP status returned to the provider.
    ///
    /// Signature and payload failures are client errors so the provider does
    /// not keep redelivering a request we will never accept.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSignature | WebhookError::TimestampOutOfRange => {
                StatusCode::UNAUTHORIZED
            }

            WebhookError::MissingSignature(_)
            | WebhookError::InvalidTimestamp
            | WebhookError::ParseError(_)
            | WebhookError::MissingField(_) => StatusCode::BAD_REQUEST,

            WebhookError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
