//! Stripe API and webhook wire types.
//!
//! These types represent Stripe objects as they arrive in API responses and
//! webhook payloads. Only the fields the checkout flow reads are modelled.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════════
// Signature Parsing
// ════════════════════════════════════════════════════════════════════════════════

/// Error parsing the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureParseError {
    #[error("Missing Stripe-Signature header")]
    MissingHeader,

    #[error("Missing timestamp (t=) in signature")]
    MissingTimestamp,

    #[error("Missing v1 signature in header")]
    MissingV1Signature,

    #[error("Invalid timestamp format")]
    InvalidTimestamp,

    #[error("Invalid signature format (not valid hex)")]
    InvalidSignatureFormat,
}

/// Parsed Stripe-Signature header components.
///
/// The header format is `t=timestamp,v1=signature[,v1=signature...]`.
/// Stripe sends several `v1` entries while a signing secret is being rolled,
/// so every one of them is kept.
///
/// # Example
///
/// ```ignore
/// let parsed = SignatureHeader::parse("t=1704067200,v1=abc123...")?;
/// assert_eq!(parsed.timestamp, 1704067200);
/// ```
#[derive(Debug, Clone)]
pub struct SignatureHeader {
    /// Unix timestamp when Stripe signed the event.
    pub timestamp: i64,

    /// HMAC-SHA256 signatures, hex-decoded.
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    pub fn parse(header: &str) -> Result<Self, SignatureParseError> {
        if header.trim().is_empty() {
            return Err(SignatureParseError::MissingHeader);
        }

        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();

        for part in header.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or(SignatureParseError::MissingTimestamp)?;

            match key.trim() {
                "t" => {
                    timestamp = Some(
                        value
                            .trim()
                            .parse()
                            .map_err(|_| SignatureParseError::InvalidTimestamp)?,
                    );
                }
                "v1" => {
                    let signature = hex::decode(value.trim())
                        .map_err(|_| SignatureParseError::InvalidSignatureFormat)?;
                    v1_signatures.push(signature);
                }
                // v0 and unknown schemes are ignored
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or(SignatureParseError::MissingTimestamp)?;
        if v1_signatures.is_empty() {
            return Err(SignatureParseError::MissingV1Signature);
        }

        Ok(Self {
            timestamp,
            v1_signatures,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Stripe Event Types
// ════════════════════════════════════════════════════════════════════════════════

/// Raw Stripe webhook event envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeWebhookEvent {
    /// Unique event identifier (evt_...).
    pub id: String,

    /// Event type (e.g., "checkout.session.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Unix timestamp when the event was created.
    #[serde(default)]
    pub created: i64,

    pub data: StripeEventData,

    /// Whether this is a live or test event.
    #[serde(default)]
    pub livemode: bool,
}

/// Event data container.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object affected by this event.
    pub object: serde_json::Value,
}

// ════════════════════════════════════════════════════════════════════════════════
// Stripe Object Types
// ════════════════════════════════════════════════════════════════════════════════

/// Stripe Checkout Session object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeCheckoutSession {
    /// Unique session identifier (cs_...).
    pub id: String,

    /// Hosted checkout page. Absent once the session is complete or expired.
    #[serde(default)]
    pub url: Option<String>,

    /// Session status (`open`, `complete`, `expired`).
    #[serde(default)]
    pub status: Option<String>,

    /// Payment status (`paid`, `unpaid`, `no_payment_required`).
    #[serde(default)]
    pub payment_status: Option<String>,

    /// Total in minor currency units.
    #[serde(default)]
    pub amount_total: Option<i64>,

    /// Lowercase ISO currency code.
    #[serde(default)]
    pub currency: Option<String>,

    /// Order reference set at creation.
    #[serde(default)]
    pub client_reference_id: Option<String>,

    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl StripeCheckoutSession {
    /// Order ID from metadata, falling back to the client reference.
    pub fn order_id(&self) -> Option<String> {
        self.metadata
            .get("orderId")
            .cloned()
            .or_else(|| self.client_reference_id.clone())
    }
}

/// Stripe Balance object, fetched as an authenticated health probe.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeBalance {
    pub object: String,

    #[serde(default)]
    pub livemode: bool,
}

/// Error envelope returned by the Stripe API.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorBody {
    pub error: StripeApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeApiErrorDetail {
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}
