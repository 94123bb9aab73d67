//! Ping crypto checkout provider adapter.
//!
//! Implements the `PaymentProvider` port for the Ping hosted checkout API:
//! - `GET /ping` health probe
//! - `POST /checkout/sessions` session creation
//! - `GET /checkout/sessions/{id}` session lookup
//! - HMAC-SHA256 webhook verification (`x-ping-signature`)
//!
//! # Configuration
//!
//! ```ignore
//! let config = PingConfig::new(base_url, recipient_address, chain_id)
//!     .with_webhook_secret(hex_secret);
//! let provider = PingPaymentService::new(config)?;
//! ```

mod client;
mod service;
mod types;

pub use client::{PingApiError, PingClient, PingConfig};
pub use service::{PingPaymentService, PING_PROVIDER_ID, PING_SIGNATURE_HEADER};
pub use types::{
    CreateSessionRequest, CreateSessionResponse, GetSessionResponse, PingCheckoutSession,
    PingRecipient, PingResponse, PingTheme, PingWebhookPayload,
};
