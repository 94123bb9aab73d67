//! HMAC-SHA256 webhook signature verification.
//!
//! Providers sign the raw request body with a shared, hex-encoded secret and
//! send the lowercase hex digest in a header. Verification never panics: a
//! secret that is not valid hex fails closed.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed age for timestamped webhook events (5 minutes).
const MAX_EVENT_AGE_SECS: i64 = 300;

/// Maximum allowed clock skew for future events (1 minute).
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Verifies `signature` against HMAC-SHA256(`secret`, `body`).
///
/// `secret` is hex-decoded to obtain the key. Returns `false` straight away
/// when the signature length differs from the digest length; the length of
/// a hex digest is public, so only equal-length inputs go through the
/// constant-time comparison.
pub fn verify_hmac_signature(body: &[u8], signature: &str, secret: &str) -> bool {
    let Some(expected) = sign_hex(body, secret) else {
        return false;
    };

    if expected.len() != signature.len() {
        return false;
    }

    expected.as_bytes().ct_eq(signature.as_bytes()).into()
}

/// Computes the lowercase hex HMAC-SHA256 of `body` under a hex-encoded secret.
///
/// Returns `None` if the secret is empty or not valid hex.
pub fn sign_hex(body: &[u8], secret: &str) -> Option<String> {
    let key = hex::decode(secret.trim()).ok()?;
    if key.is_empty() {
        return None;
    }

    let mut mac = HmacSha256::new_from_slice(&key).ok()?;
    mac.update(body);
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Transient verification input for one inbound webhook.
///
/// When a timestamp accompanies the signature, the signed message is
/// `"{timestamp}.{body}"` and the timestamp must fall inside the replay
/// window.
#[derive(Debug, Clone)]
pub struct SignatureVerification<'a> {
    pub signature: &'a str,
    pub body: &'a [u8],
    pub timestamp: Option<i64>,
}

impl<'a> SignatureVerification<'a> {
    pub fn new(body: &'a [u8], signature: &'a str) -> Self {
        Self {
            signature,
            body,
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Verifies the signature with the given hex secret.
    ///
    /// # Errors
    ///
    /// - `TimestampOutOfRange` - Event is older than 5 minutes
    /// - `InvalidTimestamp` - Event timestamp is in the future
    /// - `InvalidSignature` - Signature does not match
    pub fn verify(&self, secret: &str) -> Result<(), WebhookError> {
        let valid = match self.timestamp {
            Some(timestamp) => {
                validate_timestamp(timestamp, chrono::Utc::now().timestamp())?;
                let mut signed = format!("{}.", timestamp).into_bytes();
                signed.extend_from_slice(self.body);
                verify_hmac_signature(&signed, self.signature, secret)
            }
            None => verify_hmac_signature(self.body, self.signature, secret),
        };

        if valid {
            Ok(())
        } else {
            Err(WebhookError::InvalidSignature)
        }
    }
}

/// Validates that a webhook timestamp is within the replay window.
pub(crate) fn validate_timestamp(timestamp: i64, now: i64) -> Result<(), WebhookError> {
    // Header timestamps are attacker-supplied; extreme values must not overflow.
    let age = now.checked_sub(timestamp).ok_or(WebhookError::InvalidTimestamp)?;

    if age > MAX_EVENT_AGE_SECS {
        return Err(WebhookError::TimestampOutOfRange);
    }

    if age < -MAX_CLOCK_SKEW_SECS {
        return Err(WebhookError::InvalidTimestamp);
    }

    Ok(())
}
