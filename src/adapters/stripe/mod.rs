//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe Checkout, including:
//! - One-off checkout sessions priced in minor units
//! - Session lookup
//! - Webhook signature verification
//!
//! # Security
//!
//! - Webhook signatures use HMAC-SHA256 with constant-time comparison
//! - Timestamps are validated to prevent replay attacks (5-minute window)
//! - All secrets are handled via `secrecy::SecretString`

mod stripe_adapter;
mod webhook_types;

pub use stripe_adapter::{
    StripeConfig, StripePaymentAdapter, STRIPE_PROVIDER_ID, STRIPE_SIGNATURE_HEADER,
};
pub use webhook_types::{
    SignatureHeader, SignatureParseError, StripeCheckoutSession, StripeWebhookEvent,
};
