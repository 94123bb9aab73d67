//! Payment provider configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration. Each provider is enabled by configuring its section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Ping crypto checkout
    pub ping: Option<PingSettings>,

    /// Stripe Checkout
    pub stripe: Option<StripeSettings>,
}

/// Ping provider settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PingSettings {
    /// Base URL of the Ping API
    pub base_url: String,

    /// Address receiving checkout funds
    pub recipient_address: String,

    /// Chain of the recipient address
    pub recipient_chain_id: String,

    /// Hex-encoded webhook signing secret. Without it every webhook is rejected.
    pub webhook_secret: Option<String>,

    /// Brand name shown on the hosted checkout page
    pub brand_name: Option<String>,

    /// Primary color of the hosted checkout page
    pub primary_color: Option<String>,

    /// Logo shown on the hosted checkout page
    pub logo_url: Option<String>,

    /// Outbound request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub request_timeout_secs: u64,
}

/// Stripe provider settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StripeSettings {
    /// Stripe API key
    pub api_key: String,

    /// Stripe webhook signing secret
    pub webhook_secret: String,

    /// Override for the Stripe API base URL
    pub api_base_url: Option<String>,

    /// Outbound request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub request_timeout_secs: u64,
}

impl PaymentConfig {
    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ping.is_none() && self.stripe.is_none() {
            return Err(ValidationError::NoProvider);
        }
        if let Some(ping) = &self.ping {
            ping.validate()?;
        }
        if let Some(stripe) = &self.stripe {
            stripe.validate()?;
        }
        Ok(())
    }
}

impl PingSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_http_url(&self.base_url) {
            return Err(ValidationError::BadBaseUrl("Ping"));
        }
        if self.recipient_address.trim().is_empty() {
            return Err(ValidationError::MissingSetting("PING__RECIPIENT_ADDRESS"));
        }
        if self.recipient_chain_id.trim().is_empty() {
            return Err(ValidationError::MissingSetting("PING__RECIPIENT_CHAIN_ID"));
        }
        if let Some(secret) = &self.webhook_secret {
            if !is_hex_secret(secret) {
                return Err(ValidationError::BadHexSecret("Ping"));
            }
        }
        Ok(())
    }
}

impl StripeSettings {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.api_key.starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.api_key.starts_with("sk_live_")
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.is_empty() {
            return Err(ValidationError::MissingSetting("STRIPE__API_KEY"));
        }
        if self.webhook_secret.is_empty() {
            return Err(ValidationError::MissingSetting("STRIPE__WEBHOOK_SECRET"));
        }

        // Verify key prefixes for safety
        if !self.api_key.starts_with("sk_") && !self.api_key.starts_with("rk_") {
            return Err(ValidationError::BadStripeKey);
        }
        if !self.webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::BadStripeWebhookSecret);
        }

        if let Some(url) = &self.api_base_url {
            if !is_http_url(url) {
                return Err(ValidationError::BadBaseUrl("Stripe"));
            }
        }

        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    reqwest::Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}

fn is_hex_secret(value: &str) -> bool {
    hex::decode(value.trim())
        .map(|bytes| !bytes.is_empty())
        .unwrap_or(false)
}

fn default_provider_timeout() -> u64 {
    30
}
