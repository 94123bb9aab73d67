//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ping` - Ping crypto checkout API
//! - `stripe` - Stripe Checkout API
//! - `http` - REST endpoints exposing the registered providers

pub mod http;
pub mod ping;
pub mod stripe;

#[cfg(test)]
pub mod mock;

pub use ping::{PingConfig, PingPaymentService};
pub use stripe::{StripeConfig, StripePaymentAdapter};
