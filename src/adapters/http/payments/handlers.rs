//! HTTP handlers for payment endpoints.
//!
//! Handlers resolve the provider named in the path and delegate to the
//! `PaymentProvider` port. No order state is read or written here.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::application::ProviderRegistry;
use crate::domain::webhook::WebhookError;
use crate::ports::{CheckoutSessionInput, PaymentError, PaymentErrorCode, PaymentProvider};

use super::dto::{ErrorResponse, ProvidersResponse, VerifyWebhookRequest, WebhookAckResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for payment handlers.
#[derive(Clone)]
pub struct PaymentsAppState {
    pub registry: Arc<ProviderRegistry>,
}

impl PaymentsAppState {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    fn provider(&self, id: &str) -> Result<Arc<dyn PaymentProvider>, PaymentsApiError> {
        self.registry
            .get(id)
            .ok_or_else(|| PaymentsApiError::UnknownProvider(id.to_string()))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/payments/providers - List registered providers
pub async fn list_providers(State(state): State<PaymentsAppState>) -> impl IntoResponse {
    let providers = state.registry.manifests().into_iter().cloned().collect();
    Json(ProvidersResponse { providers })
}

/// GET /api/payments/:provider/ping - Provider health probe
pub async fn ping(
    State(state): State<PaymentsAppState>,
    Path(provider_id): Path<String>,
) -> Result<impl IntoResponse, PaymentsApiError> {
    let provider = state.provider(&provider_id)?;
    let health = provider.ping().await?;
    Ok(Json(health))
}

/// GET /api/payments/:provider/sessions/:session_id - Normalized session lookup
pub async fn get_session(
    State(state): State<PaymentsAppState>,
    Path((provider_id, session_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, PaymentsApiError> {
    let provider = state.provider(&provider_id)?;
    let session = provider.get_session(&session_id).await?;
    Ok(Json(session))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/payments/:provider/checkout - Create a hosted checkout session
pub async fn create_checkout(
    State(state): State<PaymentsAppState>,
    Path(provider_id): Path<String>,
    Json(input): Json<CheckoutSessionInput>,
) -> Result<impl IntoResponse, PaymentsApiError> {
    let provider = state.provider(&provider_id)?;
    let output = provider.create_checkout(input).await?;
    Ok((StatusCode::CREATED, Json(output)))
}

/// POST /api/payments/:provider/webhook/verify - Verify a webhook held by the caller
pub async fn verify_webhook(
    State(state): State<PaymentsAppState>,
    Path(provider_id): Path<String>,
    Json(request): Json<VerifyWebhookRequest>,
) -> Result<impl IntoResponse, PaymentsApiError> {
    let provider = state.provider(&provider_id)?;
    let verified = provider
        .verify_webhook(request.body.as_bytes(), &request.signature)
        .await?;
    Ok(Json(verified))
}

/// POST /api/payments/:provider/webhook - Inbound webhook from the provider
///
/// The body is taken as raw bytes; the signature covers the exact bytes sent.
pub async fn receive_webhook(
    State(state): State<PaymentsAppState>,
    Path(provider_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, PaymentsApiError> {
    let provider = state.provider(&provider_id)?;
    let header_name = provider.signature_header();

    let signature = headers
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| WebhookError::MissingSignature(header_name.to_string()))?;

    let verified = provider.verify_webhook(&body, signature).await?;

    tracing::info!(
        provider = %provider_id,
        event_type = ?verified.event.event_type,
        order_id = ?verified.order_id,
        "Webhook accepted"
    );

    Ok(Json(WebhookAckResponse::from(verified)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts provider errors to HTTP responses.
#[derive(Debug)]
pub enum PaymentsApiError {
    UnknownProvider(String),
    Webhook(WebhookError),
    Payment(PaymentError),
}

impl From<PaymentError> for PaymentsApiError {
    fn from(err: PaymentError) -> Self {
        Self::Payment(err)
    }
}

impl From<WebhookError> for PaymentsApiError {
    fn from(err: WebhookError) -> Self {
        Self::Webhook(err)
    }
}

impl PaymentsApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            PaymentsApiError::UnknownProvider(_) => (StatusCode::NOT_FOUND, "PROVIDER_NOT_FOUND"),
            PaymentsApiError::Webhook(err) => (err.status_code(), "INVALID_WEBHOOK"),
            PaymentsApiError::Payment(err) => match err.code {
                PaymentErrorCode::NetworkError => (StatusCode::BAD_GATEWAY, "NETWORK_ERROR"),
                PaymentErrorCode::ProviderError => (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR"),
                PaymentErrorCode::InvalidRequest => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
                PaymentErrorCode::InvalidWebhook => (StatusCode::BAD_REQUEST, "INVALID_WEBHOOK"),
                PaymentErrorCode::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                PaymentErrorCode::NotConfigured => {
                    (StatusCode::SERVICE_UNAVAILABLE, "NOT_CONFIGURED")
                }
                PaymentErrorCode::Unknown => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            },
        }
    }
}

impl IntoResponse for PaymentsApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = self.status_and_code();

        let body = match self {
            PaymentsApiError::UnknownProvider(id) => {
                ErrorResponse::new(error_code, format!("Unknown payment provider: {}", id))
            }
            PaymentsApiError::Webhook(err) => ErrorResponse::new(error_code, err.to_string()),
            PaymentsApiError::Payment(err) => match err.provider_code {
                Some(provider_code) => ErrorResponse::with_details(
                    error_code,
                    err.message,
                    serde_json::json!({
                        "provider_code": provider_code,
                        "retryable": err.retryable,
                    }),
                ),
                None => ErrorResponse::new(error_code, err.message),
            },
        };

        if status.is_server_error() {
            tracing::error!(
                status = status.as_u16(),
                error_code,
                message = %body.message,
                "Payment request failed"
            );
        } else {
            tracing::warn!(
                status = status.as_u16(),
                error_code,
                message = %body.message,
                "Payment request rejected"
            );
        }

        (status, Json(body)).into_response()
    }
}
