//! Ping API wire types.
//!
//! These mirror the JSON exchanged with the Ping checkout API. Fields the
//! API may render either as strings or numbers are kept as raw JSON values
//! and rendered with [`json_to_string`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Response of `GET /ping`.
#[derive(Debug, Clone, Deserialize)]
pub struct PingResponse {
    pub status: String,
    #[serde(default)]
    pub timestamp: serde_json::Value,
}

/// Address that receives the funds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingRecipient {
    pub address: String,
    pub chain_id: String,
}

/// Branding applied to the hosted checkout page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingTheme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl PingTheme {
    pub fn is_empty(&self) -> bool {
        self.brand_name.is_none() && self.primary_color.is_none() && self.logo_url.is_none()
    }
}

/// Body of `POST /checkout/sessions`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    /// Whole-unit amount rendered as a string.
    pub amount: String,
    pub recipient: PingRecipient,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<PingTheme>,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: BTreeMap<String, String>,
}

/// Checkout session as stored by Ping.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingCheckoutSession {
    pub session_id: String,

    /// `CREATED`, `PENDING`, `COMPLETED`, `EXPIRED` or `CANCELLED`.
    pub status: String,

    #[serde(default)]
    pub payment_id: Option<String>,

    #[serde(default)]
    pub amount: serde_json::Value,

    #[serde(default)]
    pub recipient: Option<PingRecipient>,

    #[serde(default)]
    pub theme: Option<PingTheme>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub expires_at: Option<String>,

    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl PingCheckoutSession {
    /// Metadata with every value rendered as a string.
    pub fn string_metadata(&self) -> BTreeMap<String, String> {
        self.metadata
            .iter()
            .filter_map(|(k, v)| json_to_string(v).map(|s| (k.clone(), s)))
            .collect()
    }
}

/// Response of `POST /checkout/sessions`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session: PingCheckoutSession,
    pub session_url: String,
}

/// Response of `GET /checkout/sessions/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct GetSessionResponse {
    pub session: PingCheckoutSession,
}

/// Webhook body posted by Ping.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingWebhookPayload {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(rename = "type")]
    pub event_type: String,

    #[serde(default)]
    pub data: PingWebhookData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PingWebhookData {
    #[serde(default)]
    pub session: Option<PingCheckoutSession>,
}

/// Renders a scalar JSON value as a string; `null` becomes `None`.
pub fn json_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
