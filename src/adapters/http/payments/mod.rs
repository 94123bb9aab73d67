//! HTTP adapter for payment endpoints.
//!
//! Exposes every registered payment provider via REST API:
//! - `GET /api/payments/providers` - Provider manifests
//! - `GET /api/payments/:provider/ping` - Health probe
//! - `POST /api/payments/:provider/checkout` - Create checkout session
//! - `POST /api/payments/:provider/webhook/verify` - Verify webhook body and signature
//! - `POST /api/payments/:provider/webhook` - Inbound provider webhook
//! - `GET /api/payments/:provider/sessions/:session_id` - Session lookup

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{PaymentsApiError, PaymentsAppState};
pub use routes::payments_router;
