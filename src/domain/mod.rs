//! Domain layer containing payment value types and webhook primitives.
//!
//! # Module Organization
//!
//! - `checkout` - Amount rounding, currency codes, session status
//! - `webhook` - Signature verification and payload decoding

pub mod checkout;
pub mod webhook;
