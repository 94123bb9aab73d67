//! Route configuration for payment endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    create_checkout, get_session, list_providers, ping, receive_webhook, verify_webhook,
    PaymentsAppState,
};

/// Creates the payments router. Mount it under `/api`.
///
/// Routes:
/// - `GET /payments/providers` - Registered providers and their config schema
/// - `GET /payments/:provider/ping` - Provider health probe
/// - `POST /payments/:provider/checkout` - Create checkout session
/// - `POST /payments/:provider/webhook/verify` - Verify a webhook body and signature
/// - `POST /payments/:provider/webhook` - Inbound provider webhook
/// - `GET /payments/:provider/sessions/:session_id` - Session lookup
pub fn payments_router() -> Router<PaymentsAppState> {
    Router::new()
        .route("/payments/providers", get(list_providers))
        .route("/payments/:provider/ping", get(ping))
        .route("/payments/:provider/checkout", post(create_checkout))
        .route("/payments/:provider/webhook/verify", post(verify_webhook))
        .route("/payments/:provider/webhook", post(receive_webhook))
        .route("/payments/:provider/sessions/:session_id", get(get_session))
}
