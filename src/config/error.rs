//! Errors raised while reading or checking `AppConfig`.

use thiserror::Error;

/// Failure to produce a usable `AppConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment could not be read or deserialized.
    #[error("Failed to read configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// A setting that was read but cannot be used.
///
/// Provider variants carry the provider's display name; missing settings
/// carry the environment key suffix an operator has to set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    // Server
    #[error("Port 0 cannot be bound")]
    UnusablePort,

    #[error("Request timeout must be 1..=300 seconds, got {0}")]
    TimeoutOutOfRange(u64),

    #[error("Cannot bind to {0}")]
    BadBindAddress(String),

    // Providers
    #[error("At least one payment provider must be configured")]
    NoProvider,

    #[error("Missing setting {0}")]
    MissingSetting(&'static str),

    #[error("{0} base URL must be an absolute http(s) URL")]
    BadBaseUrl(&'static str),

    #[error("{0} webhook secret must be non-empty hex")]
    BadHexSecret(&'static str),

    #[error("Stripe API key must start with sk_ or rk_")]
    BadStripeKey,

    #[error("Stripe webhook secret must start with whsec_")]
    BadStripeWebhookSecret,
}
