//! HTTP DTOs (Data Transfer Objects) for payment endpoints.
//!
//! Checkout, session and webhook payloads reuse the port types directly;
//! only the envelopes specific to HTTP live here.

use serde::{Deserialize, Serialize};

use crate::application::ProviderManifest;
use crate::ports::{VerifiedWebhook, WebhookEventType};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to verify a webhook on behalf of a caller that already holds it.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyWebhookRequest {
    /// Raw webhook body exactly as received.
    pub body: String,
    /// Signature header value.
    pub signature: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Registered providers and their configuration schema.
#[derive(Debug, Clone, Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderManifest>,
}

/// Acknowledgement returned to a provider after an accepted webhook.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAckResponse {
    pub received: bool,
    pub event_type: WebhookEventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

impl From<VerifiedWebhook> for WebhookAckResponse {
    fn from(verified: VerifiedWebhook) -> Self {
        Self {
            received: true,
            event_type: verified.event.event_type,
            order_id: verified.order_id,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Create an error response with details.
    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}
