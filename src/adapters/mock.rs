//! Mock payment provider for testing.
//!
//! Provides a configurable implementation of `PaymentProvider` for registry
//! and router tests. Supports:
//! - Pre-configured responses
//! - Error injection per method
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{
    CheckoutSessionInput, CheckoutSessionOutput, PaymentError, PaymentProvider, ProviderHealth,
    SessionView, VerifiedWebhook, WebhookEvent, WebhookEventType,
};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new("ping");
/// mock.add_session(view);
/// mock.set_method_error("create_checkout", PaymentError::network("down"));
/// ```
#[derive(Clone)]
pub struct MockPaymentProvider {
    id: &'static str,
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Sessions returned by `get_session`, by ID.
    sessions: HashMap<String, SessionView>,

    /// Output of the next `create_checkout` call.
    next_checkout: Option<CheckoutSessionOutput>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,

    webhook_verify_mode: WebhookVerifyMode,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

/// How to handle webhook verification.
#[derive(Default, Clone)]
enum WebhookVerifyMode {
    #[default]
    AcceptAll,

    /// Accept only this exact signature.
    RequireSignature(String),

    AlwaysFail,
}

impl MockPaymentProvider {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            inner: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Create a mock that accepts only `signature`.
    pub fn requiring_signature(id: &'static str, signature: &str) -> Self {
        let mock = Self::new(id);
        mock.inner.lock().unwrap().webhook_verify_mode =
            WebhookVerifyMode::RequireSignature(signature.to_string());
        mock
    }

    /// Create a mock that fails all webhook verifications.
    pub fn rejecting_webhooks(id: &'static str) -> Self {
        let mock = Self::new(id);
        mock.inner.lock().unwrap().webhook_verify_mode = WebhookVerifyMode::AlwaysFail;
        mock
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    pub fn set_checkout(&self, output: CheckoutSessionOutput) {
        self.inner.lock().unwrap().next_checkout = Some(output);
    }

    pub fn add_session(&self, session: SessionView) {
        let id = session.id.clone();
        self.inner.lock().unwrap().sessions.insert(id, session);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.inner
            .lock()
            .unwrap()
            .method_errors
            .insert(method.to_string(), error);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<MethodCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .any(|c| c.method == method)
    }

    fn record(&self, method: &str, args: Vec<String>) -> Result<(), PaymentError> {
        let mut state = self.inner.lock().unwrap();
        state.call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
        match state.method_errors.get(method) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    fn id(&self) -> &'static str {
        self.id
    }

    fn signature_header(&self) -> &'static str {
        "x-mock-signature"
    }

    async fn ping(&self) -> Result<ProviderHealth, PaymentError> {
        self.record("ping", vec![])?;
        Ok(ProviderHealth {
            status: "ok".to_string(),
            timestamp: "1767225600".to_string(),
        })
    }

    async fn create_checkout(
        &self,
        input: CheckoutSessionInput,
    ) -> Result<CheckoutSessionOutput, PaymentError> {
        self.record(
            "create_checkout",
            vec![input.order_id.clone(), input.amount.to_string()],
        )?;
        input.validate()?;

        let next = self.inner.lock().unwrap().next_checkout.take();
        Ok(next.unwrap_or_else(|| CheckoutSessionOutput {
            session_id: format!("mock_{}", input.order_id),
            url: format!("https://pay.mock/{}", input.order_id),
        }))
    }

    async fn verify_webhook(
        &self,
        body: &[u8],
        signature: &str,
    ) -> Result<VerifiedWebhook, PaymentError> {
        self.record("verify_webhook", vec![signature.to_string()])?;

        let mode = self.inner.lock().unwrap().webhook_verify_mode.clone();
        let accepted = match mode {
            WebhookVerifyMode::AcceptAll => true,
            WebhookVerifyMode::RequireSignature(expected) => expected == signature,
            WebhookVerifyMode::AlwaysFail => false,
        };
        if !accepted {
            return Err(PaymentError::invalid_webhook("Invalid signature"));
        }

        let payload: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| PaymentError::invalid_webhook(format!("Parse error: {}", e)))?;
        let order_id = payload
            .get("orderId")
            .and_then(|v| v.as_str())
            .map(String::from);

        Ok(VerifiedWebhook {
            event: WebhookEvent {
                id: None,
                event_type: WebhookEventType::CheckoutCompleted,
                session_id: None,
                payload,
            },
            order_id,
        })
    }

    async fn get_session(&self, session_id: &str) -> Result<SessionView, PaymentError> {
        self.record("get_session", vec![session_id.to_string()])?;
        self.inner
            .lock()
            .unwrap()
            .sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| PaymentError::not_found("Session"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PaymentErrorCode;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn tracks_calls_and_injects_errors() {
        let mock = MockPaymentProvider::new("ping");
        mock.set_method_error("ping", PaymentError::network("down"));

        let err = mock.ping().await.unwrap_err();

        assert_eq!(err.code, PaymentErrorCode::NetworkError);
        assert!(mock.was_called("ping"));
        assert!(!mock.was_called("get_session"));
    }

    #[tokio::test]
    async fn required_signature_is_enforced() {
        let mock = MockPaymentProvider::requiring_signature("ping", "good");

        assert!(mock.verify_webhook(b"{}", "bad").await.is_err());
        let verified = mock
            .verify_webhook(br#"{"orderId":"o1"}"#, "good")
            .await
            .unwrap();
        assert_eq!(verified.order_id.as_deref(), Some("o1"));
        assert_eq!(mock.calls().len(), 2);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let mock = MockPaymentProvider::new("ping");
        mock.add_session(SessionView {
            id: "s1".to_string(),
            status: "completed".to_string(),
            payment_status: "paid".to_string(),
            amount_total: None,
            currency: None,
            metadata: BTreeMap::new(),
        });

        assert!(mock.get_session("s1").await.is_ok());
        let err = mock.get_session("s2").await.unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::NotFound);
    }
}
