//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait for one-off Stripe Checkout
//! payments. Each checkout is a single inline `price_data` line item priced
//! in the currency's minor units.
//!
//! # Security
//!
//! - HMAC-SHA256 signature verification with constant-time comparison
//! - Timestamp validation (5-minute window) for replay attack prevention
//! - Secrets handled via `secrecy::SecretString`
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(api_key, webhook_secret);
//! let adapter = StripePaymentAdapter::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::domain::checkout::{to_minor_units, CurrencyCode, PaymentStatus};
use crate::domain::webhook::{parse_json, validate_timestamp, WebhookError};
use crate::ports::{
    CheckoutSessionInput, CheckoutSessionOutput, PaymentError, PaymentErrorCode, PaymentProvider,
    ProviderHealth, SessionView, VerifiedWebhook, WebhookEvent, WebhookEventType,
};

use super::webhook_types::{
    SignatureHeader, SignatureParseError, StripeBalance, StripeCheckoutSession, StripeErrorBody,
    StripeWebhookEvent,
};

type HmacSha256 = Hmac<Sha256>;

/// Provider identifier used in routes and configuration.
pub const STRIPE_PROVIDER_ID: &str = "stripe";

/// Header carrying Stripe's timestamped signature.
pub const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Webhook signing secret (whsec_...).
    webhook_secret: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    request_timeout: Duration,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            webhook_secret: SecretString::new(webhook_secret.into()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Builds `{base}/v1/{segments...}`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url, PaymentError> {
        let invalid = || {
            PaymentError::new(
                PaymentErrorCode::NotConfigured,
                format!("Invalid Stripe base URL: {}", self.config.api_base_url),
            )
        };

        let mut url = reqwest::Url::parse(&self.config.api_base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push("v1")
            .extend(segments);

        Ok(url)
    }

    /// Form parameters for `POST /v1/checkout/sessions`.
    fn checkout_params(
        &self,
        input: CheckoutSessionInput,
    ) -> Result<Vec<(String, String)>, PaymentError> {
        input.validate()?;
        let currency = CurrencyCode::parse(&input.currency)?;
        let unit_amount = to_minor_units(input.amount, &currency)?;

        let mut metadata = input.metadata;
        metadata.insert("orderId".to_string(), input.order_id.clone());
        metadata.insert("currency".to_string(), currency.as_upper().to_string());

        let mut params = vec![
            ("mode".to_string(), "payment".to_string()),
            ("client_reference_id".to_string(), input.order_id.clone()),
            ("success_url".to_string(), input.success_url),
            ("cancel_url".to_string(), input.cancel_url),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            (
                "line_items[0][price_data][currency]".to_string(),
                currency.as_lower(),
            ),
            (
                "line_items[0][price_data][unit_amount]".to_string(),
                unit_amount.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                format!("Order {}", input.order_id),
            ),
        ];
        params.extend(
            metadata
                .into_iter()
                .map(|(key, value)| (format!("metadata[{}]", key), value)),
        );

        Ok(params)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        operation: &'static str,
    ) -> Result<T, PaymentError> {
        let response = request
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(operation, error = %e, "Stripe request failed");
                PaymentError::network(format!("Request to Stripe failed: {}", e))
            })?;

        let status = response.status();
        tracing::debug!(operation, status = status.as_u16(), "Stripe API responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                operation,
                status = status.as_u16(),
                "Stripe API returned error status"
            );
            return Err(stripe_error(status, &body));
        }

        response.json::<T>().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })
    }

    /// Verify webhook signature using HMAC-SHA256.
    ///
    /// The signed payload is `"{timestamp}.{body}"`, keyed with the raw
    /// `whsec_` secret. Any one matching `v1` entry is accepted.
    fn verify_signature(
        &self,
        payload: &[u8],
        header: &SignatureHeader,
    ) -> Result<(), WebhookError> {
        let now = chrono::Utc::now().timestamp();
        validate_timestamp(header.timestamp, now).map_err(|e| {
            tracing::warn!(
                event_timestamp = header.timestamp,
                current_time = now,
                "Stripe webhook outside replay window"
            );
            e
        })?;

        let mut mac = HmacSha256::new_from_slice(
            self.config.webhook_secret.expose_secret().as_bytes(),
        )
        .map_err(|_| WebhookError::NotConfigured(STRIPE_PROVIDER_ID.to_string()))?;
        mac.update(header.timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        let expected = mac.finalize().into_bytes();

        let matched = header
            .v1_signatures
            .iter()
            .any(|provided| bool::from(expected.as_slice().ct_eq(provided.as_slice())));

        if !matched {
            tracing::warn!(provider = STRIPE_PROVIDER_ID, "Invalid webhook signature");
            return Err(WebhookError::InvalidSignature);
        }

        Ok(())
    }

    /// Parse a verified Stripe event into the generic webhook shape.
    fn parse_event(&self, payload: &[u8]) -> Result<VerifiedWebhook, WebhookError> {
        let raw: serde_json::Value = parse_json(payload)?;
        let event: StripeWebhookEvent = serde_json::from_value(raw.clone())
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;

        let (session_id, order_id) = if event.event_type.starts_with("checkout.session.") {
            let session: StripeCheckoutSession =
                serde_json::from_value(event.data.object.clone()).map_err(|e| {
                    WebhookError::ParseError(format!("Invalid checkout session: {}", e))
                })?;
            let order_id = session.order_id();
            (Some(session.id), order_id)
        } else {
            let order_id = event
                .data
                .object
                .get("metadata")
                .and_then(|m| m.get("orderId"))
                .and_then(|v| v.as_str())
                .map(String::from);
            (None, order_id)
        };

        Ok(VerifiedWebhook {
            event: WebhookEvent {
                id: Some(event.id),
                event_type: map_event_type(&event.event_type),
                session_id,
                payload: raw,
            },
            order_id,
        })
    }

    fn authenticate_webhook(
        &self,
        body: &[u8],
        signature: &str,
    ) -> Result<VerifiedWebhook, WebhookError> {
        let header = SignatureHeader::parse(signature).map_err(|e| match e {
            SignatureParseError::MissingHeader => {
                WebhookError::MissingSignature(STRIPE_SIGNATURE_HEADER.to_string())
            }
            other => WebhookError::ParseError(other.to_string()),
        })?;

        self.verify_signature(body, &header)?;
        self.parse_event(body)
    }
}

/// Convert a Stripe event type to the generic event type.
fn map_event_type(event_type: &str) -> WebhookEventType {
    match event_type {
        "checkout.session.completed" | "checkout.session.async_payment_succeeded" => {
            WebhookEventType::CheckoutCompleted
        }
        "checkout.session.expired" => WebhookEventType::CheckoutExpired,
        "checkout.session.async_payment_failed" | "payment_intent.payment_failed" => {
            WebhookEventType::PaymentFailed
        }
        other => WebhookEventType::Unknown(other.to_string()),
    }
}

/// Build a `PaymentError` from a non-success Stripe response.
fn stripe_error(status: reqwest::StatusCode, body: &str) -> PaymentError {
    let detail = serde_json::from_str::<StripeErrorBody>(body)
        .ok()
        .map(|b| b.error);

    let reason = detail
        .as_ref()
        .and_then(|d| d.message.clone())
        .unwrap_or_else(|| body.to_string());
    let message = format!("Stripe API returned HTTP {}: {}", status.as_u16(), reason);
    let provider_code = detail
        .and_then(|d| d.code)
        .unwrap_or_else(|| status.as_u16().to_string());

    let error = if status == reqwest::StatusCode::NOT_FOUND {
        PaymentError::new(PaymentErrorCode::NotFound, message)
    } else {
        PaymentError::provider(message)
    };
    error.with_provider_code(provider_code)
}

fn session_view(session: StripeCheckoutSession) -> SessionView {
    let paid = session.payment_status.as_deref() == Some("paid");

    SessionView {
        id: session.id,
        status: session.status.unwrap_or_default(),
        payment_status: PaymentStatus::from_completed(paid).as_str().to_string(),
        amount_total: session.amount_total.map(|amount| amount.to_string()),
        currency: session.currency.map(|c| c.to_ascii_uppercase()),
        metadata: session.metadata,
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    fn id(&self) -> &'static str {
        STRIPE_PROVIDER_ID
    }

    fn signature_header(&self) -> &'static str {
        STRIPE_SIGNATURE_HEADER
    }

    async fn ping(&self) -> Result<ProviderHealth, PaymentError> {
        let url = self.endpoint(&["balance"])?;
        let balance: StripeBalance = self
            .send(self.http_client.get(url), "GET /v1/balance")
            .await
            .map_err(|e| e.context("Stripe health check failed"))?;

        tracing::debug!(livemode = balance.livemode, object = %balance.object, "Stripe reachable");

        Ok(ProviderHealth {
            status: "ok".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        })
    }

    async fn create_checkout(
        &self,
        input: CheckoutSessionInput,
    ) -> Result<CheckoutSessionOutput, PaymentError> {
        let order_id = input.order_id.clone();
        let params = self.checkout_params(input)?;
        let url = self.endpoint(&["checkout", "sessions"])?;

        let request = self
            .http_client
            .post(url)
            .header("Idempotency-Key", Uuid::new_v4().to_string())
            .form(&params);

        let session: StripeCheckoutSession = self
            .send(request, "POST /v1/checkout/sessions")
            .await
            .map_err(|e| {
                tracing::error!(order_id = %order_id, error = %e, "Stripe checkout failed");
                e.context("Failed to create checkout session")
            })?;

        let url = session.url.ok_or_else(|| {
            PaymentError::provider("Stripe session has no checkout URL")
                .context("Failed to create checkout session")
        })?;

        tracing::info!(
            order_id = %order_id,
            session_id = %session.id,
            "Stripe checkout session created"
        );

        Ok(CheckoutSessionOutput {
            session_id: session.id,
            url,
        })
    }

    async fn verify_webhook(
        &self,
        body: &[u8],
        signature: &str,
    ) -> Result<VerifiedWebhook, PaymentError> {
        let verified = self.authenticate_webhook(body, signature).map_err(|e| {
            tracing::warn!(provider = STRIPE_PROVIDER_ID, error = %e, "Rejected Stripe webhook");
            PaymentError::from(e)
        })?;

        tracing::info!(
            event_id = ?verified.event.id,
            event_type = ?verified.event.event_type,
            order_id = ?verified.order_id,
            "Stripe webhook verified"
        );

        Ok(verified)
    }

    async fn get_session(&self, session_id: &str) -> Result<SessionView, PaymentError> {
        if session_id.trim().is_empty() {
            return Err(PaymentError::invalid_request("Session ID is required"));
        }

        let url = self.endpoint(&["checkout", "sessions", session_id])?;
        let session: StripeCheckoutSession = self
            .send(self.http_client.get(url), "GET /v1/checkout/sessions/{id}")
            .await
            .map_err(|e| e.context("Failed to retrieve session"))?;

        Ok(session_view(session))
    }
}
