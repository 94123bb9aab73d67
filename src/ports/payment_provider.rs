//! Payment provider port for external checkout backends.
//!
//! Defines the contract every payment backend (Ping, Stripe) implements.
//! The layer is a stateless pass-through: sessions live at the provider and
//! order state is owned elsewhere.
//!
//! # Design
//!
//! - **Gateway agnostic**: Capability set `{ping, create_checkout, verify_webhook, get_session}`
//! - **Explicit errors**: Every operation returns `PaymentError`, nothing panics
//! - **No retries**: Failures are surfaced to the caller as-is

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::checkout::CheckoutError;
use crate::domain::webhook::WebhookError;

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Stable identifier used in routes and configuration (e.g. `ping`).
    fn id(&self) -> &'static str;

    /// Name of the HTTP header carrying the webhook signature.
    fn signature_header(&self) -> &'static str;

    /// Health probe against the provider API.
    async fn ping(&self) -> Result<ProviderHealth, PaymentError>;

    /// Create a checkout session and return where to redirect the customer.
    async fn create_checkout(
        &self,
        input: CheckoutSessionInput,
    ) -> Result<CheckoutSessionOutput, PaymentError>;

    /// Verify a webhook signature and interpret the event.
    ///
    /// Returns an error for any body that cannot be authenticated; callers
    /// must not act on the payload in that case.
    async fn verify_webhook(
        &self,
        body: &[u8],
        signature: &str,
    ) -> Result<VerifiedWebhook, PaymentError>;

    /// Fetch a session from the provider and normalize it.
    async fn get_session(&self, session_id: &str) -> Result<SessionView, PaymentError>;
}

/// Generic checkout request, created once per checkout attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionInput {
    /// Amount in decimal currency units.
    pub amount: f64,

    /// Internal order ID (stored as metadata).
    pub order_id: String,

    /// ISO 4217 currency code.
    pub currency: String,

    /// URL to redirect after successful checkout.
    pub success_url: String,

    /// URL to redirect after cancelled checkout.
    pub cancel_url: String,

    /// Caller metadata forwarded to the provider.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl CheckoutSessionInput {
    /// Checks fields every provider needs before any network call.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if self.order_id.trim().is_empty() {
            return Err(CheckoutError::MissingField("orderId"));
        }
        if self.success_url.trim().is_empty() {
            return Err(CheckoutError::MissingField("successUrl"));
        }
        if self.cancel_url.trim().is_empty() {
            return Err(CheckoutError::MissingField("cancelUrl"));
        }
        Ok(())
    }
}

/// Result of a created checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionOutput {
    /// Provider-assigned session ID.
    pub session_id: String,

    /// Redirect target for the customer.
    pub url: String,
}

/// Provider health probe result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderHealth {
    pub status: String,
    pub timestamp: String,
}

/// Normalized view of a provider session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub id: String,

    /// Provider status, lowercased.
    pub status: String,

    /// `paid` or `unpaid`.
    pub payment_status: String,

    pub amount_total: Option<String>,

    pub currency: Option<String>,

    pub metadata: BTreeMap<String, String>,
}

/// Authenticated webhook with the order it refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedWebhook {
    pub event: WebhookEvent,
    pub order_id: Option<String>,
}

/// Webhook event from a payment provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    /// Event ID from provider (if it assigns one).
    pub id: Option<String>,

    pub event_type: WebhookEventType,

    pub session_id: Option<String>,

    /// Raw event body for downstream consumers.
    pub payload: serde_json::Value,
}

/// Types of webhook events we distinguish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    /// Checkout session completed successfully.
    CheckoutCompleted,

    /// Payment submitted but not yet confirmed.
    CheckoutPending,

    /// Checkout session expired unpaid.
    CheckoutExpired,

    /// Checkout session cancelled.
    CheckoutCancelled,

    /// Payment attempt failed.
    PaymentFailed,

    /// Unknown event type.
    Unknown(String),
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Provider's error code or HTTP status (if available).
    pub provider_code: Option<String>,

    /// Whether the operation could be retried by the caller.
    pub retryable: bool,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    /// Create with provider code.
    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create a provider API error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidRequest, message)
    }

    /// Create a not found error.
    pub fn not_found(resource: &str) -> Self {
        Self::new(
            PaymentErrorCode::NotFound,
            format!("{} not found", resource),
        )
    }

    /// Create an invalid webhook error.
    pub fn invalid_webhook(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidWebhook, message)
    }

    /// Prefix the message with the operation that failed.
    pub fn context(mut self, operation: &str) -> Self {
        self.message = format!("{}: {}", operation, self.message);
        self
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<CheckoutError> for PaymentError {
    fn from(err: CheckoutError) -> Self {
        PaymentError::invalid_request(err.to_string())
    }
}

impl From<WebhookError> for PaymentError {
    fn from(err: WebhookError) -> Self {
        let code = match err {
            WebhookError::NotConfigured(_) => PaymentErrorCode::NotConfigured,
            _ => PaymentErrorCode::InvalidWebhook,
        };
        PaymentError::new(code, err.to_string())
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// Provider answered with a non-success status or an unreadable body.
    ProviderError,

    /// Request rejected before reaching the provider.
    InvalidRequest,

    /// Invalid webhook signature or payload.
    InvalidWebhook,

    /// Resource not found.
    NotFound,

    /// Provider is missing configuration for this operation.
    NotConfigured,

    /// Unknown error.
    Unknown,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentErrorCode::NetworkError)
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::ProviderError => "provider_error",
            PaymentErrorCode::InvalidRequest => "invalid_request",
            PaymentErrorCode::InvalidWebhook => "invalid_webhook",
            PaymentErrorCode::NotFound => "not_found",
            PaymentErrorCode::NotConfigured => "not_configured",
            PaymentErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}
