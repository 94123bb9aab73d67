//! Webhook utilities shared by every payment provider.
//!
//! # Module Structure
//!
//! - `signature` - HMAC-SHA256 verification with constant-time comparison
//! - `payload` - JSON decoding that reports errors instead of panicking
//! - `errors` - Rejection reasons with HTTP status mapping

mod errors;
mod payload;
mod signature;

pub use errors::WebhookError;
pub use payload::parse_json;
pub use signature::{sign_hex, verify_hmac_signature, SignatureVerification};

pub(crate) use signature::validate_timestamp;
