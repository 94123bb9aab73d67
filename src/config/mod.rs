//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `STOREFRONT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use storefront_payments::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod payment;
mod server;

pub use error::{ConfigError, ValidationError};
pub use payment::{PaymentConfig, PingSettings, StripeSettings};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
/// The loaded value is passed explicitly to whatever needs it.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Payment provider configuration (Ping, Stripe)
    #[serde(default)]
    pub payment: PaymentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `STOREFRONT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `STOREFRONT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `STOREFRONT__PAYMENT__PING__BASE_URL=...` -> `payment.ping.base_url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("STOREFRONT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid or no
    /// payment provider is configured.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.payment.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const PING_VARS: &[(&str, &str)] = &[
        ("STOREFRONT__PAYMENT__PING__BASE_URL", "https://api.ping.example/v1"),
        ("STOREFRONT__PAYMENT__PING__RECIPIENT_ADDRESS", "0xabc"),
        ("STOREFRONT__PAYMENT__PING__RECIPIENT_CHAIN_ID", "8453"),
        ("STOREFRONT__PAYMENT__PING__WEBHOOK_SECRET", "00ff00ff"),
    ];

    const OTHER_VARS: &[&str] = &[
        "STOREFRONT__PAYMENT__STRIPE__API_KEY",
        "STOREFRONT__PAYMENT__STRIPE__WEBHOOK_SECRET",
        "STOREFRONT__SERVER__PORT",
        "STOREFRONT__SERVER__ENVIRONMENT",
    ];

    fn set_ping_env() {
        for (key, value) in PING_VARS {
            env::set_var(key, value);
        }
    }

    fn clear_env() {
        for (key, _) in PING_VARS {
            env::remove_var(key);
        }
        for key in OTHER_VARS {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_ping_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        let ping = config.payment.ping.unwrap();
        assert_eq!(ping.base_url, "https://api.ping.example/v1");
        assert_eq!(ping.recipient_chain_id, "8453");
        assert_eq!(ping.request_timeout_secs, 30);
        assert!(config.payment.stripe.is_none());
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_ping_env();
        env::set_var("STOREFRONT__PAYMENT__STRIPE__API_KEY", "sk_test_xxx");
        env::set_var("STOREFRONT__PAYMENT__STRIPE__WEBHOOK_SECRET", "whsec_xxx");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.payment.stripe.is_some());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_without_providers_fails() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::NoProvider)
        ));
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_ping_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_ping_env();
        env::set_var("STOREFRONT__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_ping_env();
        env::set_var("STOREFRONT__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
    }
}
