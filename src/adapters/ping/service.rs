//! Ping payment provider service.
//!
//! Implements the `PaymentProvider` port on top of [`PingClient`]:
//! amounts are rounded to whole units, the configured recipient and theme
//! are injected, and order bookkeeping travels in session metadata.
//!
//! # Security
//!
//! Webhooks are accepted only with a valid HMAC-SHA256 signature over the
//! raw body. A service without a webhook secret rejects every webhook.

use async_trait::async_trait;
use secrecy::ExposeSecret;

use crate::domain::checkout::{
    format_whole_units, CurrencyCode, PaymentStatus, ProviderSessionStatus,
};
use crate::domain::webhook::{parse_json, verify_hmac_signature, WebhookError};
use crate::ports::{
    CheckoutSessionInput, CheckoutSessionOutput, PaymentError, PaymentProvider, ProviderHealth,
    SessionView, VerifiedWebhook, WebhookEvent, WebhookEventType,
};

use super::client::{PingApiError, PingClient, PingConfig};
use super::types::{json_to_string, CreateSessionRequest, PingCheckoutSession, PingWebhookPayload};

/// Provider identifier used in routes and configuration.
pub const PING_PROVIDER_ID: &str = "ping";

/// Header carrying the hex HMAC-SHA256 of the webhook body.
pub const PING_SIGNATURE_HEADER: &str = "x-ping-signature";

/// Metadata key holding the internal order ID.
const ORDER_ID_KEY: &str = "orderId";

/// Metadata key holding the order currency.
const CURRENCY_KEY: &str = "currency";

/// Ping payment provider.
pub struct PingPaymentService {
    config: PingConfig,
    client: PingClient,
}

impl PingPaymentService {
    /// Create a service and its HTTP client from configuration.
    pub fn new(config: PingConfig) -> Result<Self, PingApiError> {
        let client = PingClient::new(&config)?;
        Ok(Self { config, client })
    }

    /// Translate the generic checkout input into a Ping request.
    fn build_session_request(
        &self,
        input: CheckoutSessionInput,
    ) -> Result<CreateSessionRequest, PaymentError> {
        input.validate()?;
        let currency = CurrencyCode::parse(&input.currency)?;
        let amount = format_whole_units(input.amount)?;

        // Internal bookkeeping keys override caller-supplied ones.
        let mut metadata = input.metadata;
        metadata.insert(ORDER_ID_KEY.to_string(), input.order_id);
        metadata.insert(CURRENCY_KEY.to_string(), currency.as_upper().to_string());

        let theme = self.config.theme();

        Ok(CreateSessionRequest {
            amount,
            recipient: self.config.recipient(),
            theme: (!theme.is_empty()).then(|| theme.clone()),
            success_url: input.success_url,
            cancel_url: input.cancel_url,
            metadata,
        })
    }

    /// Authenticate and decode a webhook body.
    fn authenticate_webhook(
        &self,
        body: &[u8],
        signature: &str,
    ) -> Result<VerifiedWebhook, WebhookError> {
        let secret = self
            .config
            .webhook_secret()
            .ok_or_else(|| WebhookError::NotConfigured(PING_PROVIDER_ID.to_string()))?;

        if signature.is_empty() {
            return Err(WebhookError::MissingSignature(
                PING_SIGNATURE_HEADER.to_string(),
            ));
        }

        if !verify_hmac_signature(body, signature, secret.expose_secret()) {
            tracing::warn!(provider = PING_PROVIDER_ID, "Invalid webhook signature");
            return Err(WebhookError::InvalidSignature);
        }

        let raw: serde_json::Value = parse_json(body)?;
        let payload: PingWebhookPayload = serde_json::from_value(raw.clone())
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;

        let session = payload
            .data
            .session
            .ok_or(WebhookError::MissingField("data.session"))?;

        let order_id = session.metadata.get(ORDER_ID_KEY).and_then(json_to_string);

        Ok(VerifiedWebhook {
            event: WebhookEvent {
                id: payload.id,
                event_type: map_event_type(&payload.event_type),
                session_id: Some(session.session_id),
                payload: raw,
            },
            order_id,
        })
    }
}

/// Map a Ping event type string to the generic event type.
fn map_event_type(event_type: &str) -> WebhookEventType {
    match event_type {
        "checkout.session.completed" => WebhookEventType::CheckoutCompleted,
        "checkout.session.pending" => WebhookEventType::CheckoutPending,
        "checkout.session.expired" => WebhookEventType::CheckoutExpired,
        "checkout.session.cancelled" | "checkout.session.canceled" => {
            WebhookEventType::CheckoutCancelled
        }
        "payment.failed" => WebhookEventType::PaymentFailed,
        other => WebhookEventType::Unknown(other.to_string()),
    }
}

/// Normalize a Ping session for callers of `get_session`.
fn session_view(session: PingCheckoutSession) -> SessionView {
    let (status, payment_status) = match session.status.parse::<ProviderSessionStatus>() {
        Ok(status) => (status.as_lowercase().to_string(), status.payment_status()),
        Err(_) => {
            tracing::warn!(
                session_id = %session.session_id,
                status = %session.status,
                "Unrecognized Ping session status"
            );
            (session.status.to_lowercase(), PaymentStatus::Unpaid)
        }
    };

    let metadata = session.string_metadata();

    SessionView {
        id: session.session_id,
        status,
        payment_status: payment_status.as_str().to_string(),
        amount_total: json_to_string(&session.amount),
        currency: metadata.get(CURRENCY_KEY).cloned(),
        metadata,
    }
}

#[async_trait]
impl PaymentProvider for PingPaymentService {
    fn id(&self) -> &'static str {
        PING_PROVIDER_ID
    }

    fn signature_header(&self) -> &'static str {
        PING_SIGNATURE_HEADER
    }

    async fn ping(&self) -> Result<ProviderHealth, PaymentError> {
        let response = self
            .client
            .ping()
            .await
            .map_err(|e| e.into_payment_error().context("Ping health check failed"))?;

        Ok(ProviderHealth {
            status: response.status,
            timestamp: json_to_string(&response.timestamp).unwrap_or_default(),
        })
    }

    async fn create_checkout(
        &self,
        input: CheckoutSessionInput,
    ) -> Result<CheckoutSessionOutput, PaymentError> {
        let order_id = input.order_id.clone();
        let request = self.build_session_request(input)?;

        let response = self
            .client
            .create_checkout_session(&request)
            .await
            .map_err(|e| {
                tracing::error!(order_id = %order_id, error = %e, "Ping checkout failed");
                e.into_payment_error()
                    .context("Failed to create checkout session")
            })?;

        tracing::info!(
            order_id = %order_id,
            session_id = %response.session.session_id,
            "Ping checkout session created"
        );

        Ok(CheckoutSessionOutput {
            session_id: response.session.session_id,
            url: response.session_url,
        })
    }

    async fn verify_webhook(
        &self,
        body: &[u8],
        signature: &str,
    ) -> Result<VerifiedWebhook, PaymentError> {
        let verified = self.authenticate_webhook(body, signature).map_err(|e| {
            tracing::warn!(provider = PING_PROVIDER_ID, error = %e, "Rejected Ping webhook");
            PaymentError::from(e)
        })?;

        tracing::info!(
            event_type = ?verified.event.event_type,
            order_id = ?verified.order_id,
            "Ping webhook verified"
        );

        Ok(verified)
    }

    async fn get_session(&self, session_id: &str) -> Result<SessionView, PaymentError> {
        if session_id.trim().is_empty() {
            return Err(PaymentError::invalid_request("Session ID is required"));
        }

        let response = self
            .client
            .get_checkout_session(session_id)
            .await
            .map_err(|e| {
                tracing::error!(session_id, error = %e, "Ping session lookup failed");
                e.into_payment_error().context("Failed to retrieve session")
            })?;

        Ok(session_view(response.session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::webhook::sign_hex;
    use crate::ports::PaymentErrorCode;
    use std::collections::BTreeMap;

    const TEST_SECRET: &str = "5e3f1a2b3c4d5e6f708192a3b4c5d6e7";

    fn test_config(base_url: &str) -> PingConfig {
        PingConfig::new(base_url, "0xrecipient", "8453")
    }

    fn test_service(base_url: &str) -> PingPaymentService {
        PingPaymentService::new(test_config(base_url).with_webhook_secret(TEST_SECRET)).unwrap()
    }

    fn sample_input() -> CheckoutSessionInput {
        CheckoutSessionInput {
            amount: 1999.6,
            order_id: "o1".to_string(),
            currency: "USD".to_string(),
            success_url: "https://x/success".to_string(),
            cancel_url: "https://x/cancel".to_string(),
            metadata: BTreeMap::new(),
        }
    }

    fn completed_webhook_body() -> String {
        serde_json::json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": {
                "session": {
                    "sessionId": "s1",
                    "status": "COMPLETED",
                    "amount": "2000",
                    "metadata": {"orderId": "o1", "currency": "USD"}
                }
            }
        })
        .to_string()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Request Translation Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn build_request_rounds_amount_and_adds_bookkeeping() {
        let service = test_service("https://ping.example");

        let request = service.build_session_request(sample_input()).unwrap();

        assert_eq!(request.amount, "2000");
        assert_eq!(request.metadata.get("orderId").unwrap(), "o1");
        assert_eq!(request.metadata.get("currency").unwrap(), "USD");
        assert_eq!(request.recipient.address, "0xrecipient");
        assert_eq!(request.recipient.chain_id, "8453");
        assert_eq!(request.success_url, "https://x/success");
        assert_eq!(request.cancel_url, "https://x/cancel");
    }

    #[test]
    fn build_request_keeps_caller_metadata_but_bookkeeping_wins() {
        let service = test_service("https://ping.example");
        let mut input = sample_input();
        input
            .metadata
            .insert("cartId".to_string(), "cart_9".to_string());
        input
            .metadata
            .insert("orderId".to_string(), "spoofed".to_string());

        let request = service.build_session_request(input).unwrap();

        assert_eq!(request.metadata.get("cartId").unwrap(), "cart_9");
        assert_eq!(request.metadata.get("orderId").unwrap(), "o1");
    }

    #[test]
    fn build_request_normalizes_currency() {
        let service = test_service("https://ping.example");
        let input = CheckoutSessionInput {
            currency: "usd".to_string(),
            ..sample_input()
        };

        let request = service.build_session_request(input).unwrap();

        assert_eq!(request.metadata.get("currency").unwrap(), "USD");
    }

    #[test]
    fn build_request_injects_theme_when_configured() {
        let theme = super::super::types::PingTheme {
            brand_name: Some("Storefront".to_string()),
            ..Default::default()
        };
        let service =
            PingPaymentService::new(test_config("https://ping.example").with_theme(theme.clone()))
                .unwrap();

        let request = service.build_session_request(sample_input()).unwrap();

        assert_eq!(request.theme, Some(theme));
    }

    #[test]
    fn build_request_rejects_negative_amount() {
        let service = test_service("https://ping.example");
        let input = CheckoutSessionInput {
            amount: -5.0,
            ..sample_input()
        };

        let err = service.build_session_request(input).unwrap_err();

        assert_eq!(err.code, PaymentErrorCode::InvalidRequest);
    }

    #[test]
    fn build_request_rejects_bad_currency() {
        let service = test_service("https://ping.example");
        let input = CheckoutSessionInput {
            currency: "dollars".to_string(),
            ..sample_input()
        };

        assert!(service.build_session_request(input).is_err());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Session Normalization Tests
    // ════════════════════════════════════════════════════════════════════════════

    fn session(status: &str) -> PingCheckoutSession {
        serde_json::from_value(serde_json::json!({
            "sessionId": "s1",
            "status": status,
            "amount": "2000",
            "metadata": {"orderId": "o1", "currency": "USD"}
        }))
        .unwrap()
    }

    #[test]
    fn completed_session_is_paid() {
        let view = session_view(session("COMPLETED"));

        assert_eq!(view.status, "completed");
        assert_eq!(view.payment_status, "paid");
        assert_eq!(view.amount_total.as_deref(), Some("2000"));
        assert_eq!(view.currency.as_deref(), Some("USD"));
        assert_eq!(view.metadata.get("orderId").unwrap(), "o1");
    }

    #[test]
    fn other_statuses_are_unpaid() {
        for status in ["CREATED", "PENDING", "EXPIRED", "CANCELLED"] {
            let view = session_view(session(status));
            assert_eq!(view.payment_status, "unpaid", "status {status}");
            assert_eq!(view.status, status.to_lowercase());
        }
    }

    #[test]
    fn unknown_status_is_lowercased_and_unpaid() {
        let view = session_view(session("REFUNDED"));

        assert_eq!(view.status, "refunded");
        assert_eq!(view.payment_status, "unpaid");
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Webhook Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn verify_webhook_accepts_valid_signature() {
        let service = test_service("https://ping.example");
        let body = completed_webhook_body();
        let signature = sign_hex(body.as_bytes(), TEST_SECRET).unwrap();

        let verified = service
            .verify_webhook(body.as_bytes(), &signature)
            .await
            .unwrap();

        assert_eq!(verified.event.event_type, WebhookEventType::CheckoutCompleted);
        assert_eq!(verified.event.id.as_deref(), Some("evt_1"));
        assert_eq!(verified.event.session_id.as_deref(), Some("s1"));
        assert_eq!(verified.order_id.as_deref(), Some("o1"));
    }

    #[tokio::test]
    async fn verify_webhook_rejects_bad_signature() {
        let service = test_service("https://ping.example");
        let body = completed_webhook_body();

        let err = service
            .verify_webhook(body.as_bytes(), &"0".repeat(64))
            .await
            .unwrap_err();

        assert_eq!(err.code, PaymentErrorCode::InvalidWebhook);
        assert!(err.message.contains("Invalid signature"));
    }

    #[tokio::test]
    async fn verify_webhook_rejects_tampered_body() {
        let service = test_service("https://ping.example");
        let body = completed_webhook_body();
        let signature = sign_hex(body.as_bytes(), TEST_SECRET).unwrap();
        let tampered = body.replace("o1", "o2");

        let result = service.verify_webhook(tampered.as_bytes(), &signature).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn verify_webhook_rejects_empty_signature() {
        let service = test_service("https://ping.example");

        let err = service.verify_webhook(b"{}", "").await.unwrap_err();

        assert_eq!(err.code, PaymentErrorCode::InvalidWebhook);
        assert!(err.message.contains(PING_SIGNATURE_HEADER));
    }

    #[tokio::test]
    async fn verify_webhook_signed_garbage_is_parse_error() {
        let service = test_service("https://ping.example");
        let body = b"{invalid";
        let signature = sign_hex(body, TEST_SECRET).unwrap();

        let err = service.verify_webhook(body, &signature).await.unwrap_err();

        assert_eq!(err.code, PaymentErrorCode::InvalidWebhook);
        assert!(err.message.contains("Parse error"));
    }

    #[tokio::test]
    async fn verify_webhook_requires_session() {
        let service = test_service("https://ping.example");
        let body = br#"{"type":"checkout.session.completed","data":{}}"#;
        let signature = sign_hex(body, TEST_SECRET).unwrap();

        let err = service.verify_webhook(body, &signature).await.unwrap_err();

        assert!(err.message.contains("data.session"));
    }

    #[tokio::test]
    async fn verify_webhook_without_secret_rejects_everything() {
        let service = PingPaymentService::new(test_config("https://ping.example")).unwrap();
        let body = completed_webhook_body();
        let signature = sign_hex(body.as_bytes(), TEST_SECRET).unwrap();

        let err = service
            .verify_webhook(body.as_bytes(), &signature)
            .await
            .unwrap_err();

        assert_eq!(err.code, PaymentErrorCode::NotConfigured);
    }

    #[test]
    fn event_types_map_to_generic_events() {
        assert_eq!(
            map_event_type("checkout.session.expired"),
            WebhookEventType::CheckoutExpired
        );
        assert_eq!(
            map_event_type("checkout.session.canceled"),
            WebhookEventType::CheckoutCancelled
        );
        assert_eq!(
            map_event_type("refund.created"),
            WebhookEventType::Unknown("refund.created".to_string())
        );
    }

    // ════════════════════════════════════════════════════════════════════════════
    // HTTP Round Trip Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn create_checkout_returns_session_id_and_url() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("POST", "/checkout/sessions")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "amount": "2000",
                "metadata": {"orderId": "o1", "currency": "USD"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"session":{"sessionId":"s1","status":"CREATED"},"sessionUrl":"https://pay/x/s1"}"#)
            .create_async()
            .await;

        let service = test_service(&server.url());
        let output = service.create_checkout(sample_input()).await.unwrap();

        m.assert_async().await;
        assert_eq!(
            output,
            CheckoutSessionOutput {
                session_id: "s1".to_string(),
                url: "https://pay/x/s1".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn create_checkout_wraps_provider_failure() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/checkout/sessions")
            .with_status(400)
            .with_body(r#"{"error":"recipient not allowed"}"#)
            .create_async()
            .await;

        let service = test_service(&server.url());
        let err = service.create_checkout(sample_input()).await.unwrap_err();

        assert_eq!(err.code, PaymentErrorCode::ProviderError);
        assert!(err.message.starts_with("Failed to create checkout session"));
        assert!(err.message.contains("recipient not allowed"));
        assert_eq!(err.provider_code.as_deref(), Some("400"));
    }

    #[tokio::test]
    async fn get_session_normalizes_remote_session() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/checkout/sessions/s1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"session":{"sessionId":"s1","status":"COMPLETED","paymentId":"pay_1","amount":2000,"metadata":{"orderId":"o1","currency":"USD"}}}"#)
            .create_async()
            .await;

        let service = test_service(&server.url());
        let view = service.get_session("s1").await.unwrap();

        assert_eq!(view.status, "completed");
        assert_eq!(view.payment_status, "paid");
        assert_eq!(view.amount_total.as_deref(), Some("2000"));
    }

    #[tokio::test]
    async fn get_session_missing_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/checkout/sessions/nope")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let service = test_service(&server.url());
        let err = service.get_session("nope").await.unwrap_err();

        assert_eq!(err.code, PaymentErrorCode::NotFound);
        assert!(err.message.starts_with("Failed to retrieve session"));
    }

    #[tokio::test]
    async fn get_session_requires_id() {
        let service = test_service("https://ping.example");

        let err = service.get_session(" ").await.unwrap_err();

        assert_eq!(err.code, PaymentErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn ping_reports_provider_health() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/ping")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"ok","timestamp":1767225600}"#)
            .create_async()
            .await;

        let service = test_service(&server.url());
        let health = service.ping().await.unwrap();

        assert_eq!(health.status, "ok");
        assert_eq!(health.timestamp, "1767225600");
    }
}
