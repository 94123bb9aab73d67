//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Payment Ports
//!
//! - `PaymentProvider` - Checkout, session lookup and webhook verification

mod payment_provider;

pub use payment_provider::{
    CheckoutSessionInput, CheckoutSessionOutput, PaymentError, PaymentErrorCode, PaymentProvider,
    ProviderHealth, SessionView, VerifiedWebhook, WebhookEvent, WebhookEventType,
};
