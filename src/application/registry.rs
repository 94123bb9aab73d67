//! Provider registry and plugin manifests.
//!
//! Each payment provider registers under a stable ID together with a
//! manifest describing its configuration schema. The HTTP layer resolves
//! providers by ID at request time.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::adapters::ping::{PingConfig, PingPaymentService, PingTheme, PING_PROVIDER_ID};
use crate::adapters::stripe::{StripeConfig, StripePaymentAdapter, STRIPE_PROVIDER_ID};
use crate::config::{PaymentConfig, PingSettings, StripeSettings};
use crate::ports::PaymentProvider;

/// One configuration key a provider understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigField {
    pub key: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub secret: bool,
}

impl ConfigField {
    fn new(key: &'static str, description: &'static str) -> Self {
        Self {
            key,
            description,
            required: true,
            secret: false,
        }
    }

    fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    fn secret(mut self) -> Self {
        self.secret = true;
        self
    }
}

/// Static description of a payment provider plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderManifest {
    pub id: &'static str,
    pub display_name: &'static str,
    pub config_schema: Vec<ConfigField>,
    pub required_secrets: Vec<&'static str>,
}

impl ProviderManifest {
    pub fn ping() -> Self {
        Self {
            id: PING_PROVIDER_ID,
            display_name: "Ping",
            config_schema: vec![
                ConfigField::new("base_url", "Base URL of the Ping API"),
                ConfigField::new("recipient_address", "Address receiving checkout funds"),
                ConfigField::new("recipient_chain_id", "Chain of the recipient address"),
                ConfigField::new("webhook_secret", "Hex-encoded webhook signing secret")
                    .optional()
                    .secret(),
                ConfigField::new("brand_name", "Checkout page brand name").optional(),
                ConfigField::new("primary_color", "Checkout page primary color").optional(),
                ConfigField::new("logo_url", "Checkout page logo").optional(),
            ],
            required_secrets: vec![],
        }
    }

    pub fn stripe() -> Self {
        Self {
            id: STRIPE_PROVIDER_ID,
            display_name: "Stripe",
            config_schema: vec![
                ConfigField::new("api_key", "Stripe secret API key").secret(),
                ConfigField::new("webhook_secret", "Stripe webhook signing secret (whsec_)")
                    .secret(),
                ConfigField::new("api_base_url", "Override for the Stripe API base URL")
                    .optional(),
            ],
            required_secrets: vec!["api_key", "webhook_secret"],
        }
    }
}

/// Errors while building the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Provider already registered: {0}")]
    Duplicate(&'static str),

    #[error("Manifest {manifest} does not match provider {provider}")]
    IdMismatch {
        manifest: &'static str,
        provider: &'static str,
    },

    #[error("Failed to initialise {provider} provider: {message}")]
    Init {
        provider: &'static str,
        message: String,
    },
}

struct RegisteredProvider {
    manifest: ProviderManifest,
    provider: Arc<dyn PaymentProvider>,
}

/// Registered payment providers, keyed by ID.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<&'static str, RegisteredProvider>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry with every provider that has a configuration section.
    pub fn from_config(config: &PaymentConfig) -> Result<Self, RegistryError> {
        let mut registry = Self::new();

        if let Some(settings) = &config.ping {
            let service = PingPaymentService::new(ping_config(settings)).map_err(|e| {
                RegistryError::Init {
                    provider: PING_PROVIDER_ID,
                    message: e.to_string(),
                }
            })?;
            registry.register(ProviderManifest::ping(), Arc::new(service))?;
        }

        if let Some(settings) = &config.stripe {
            let adapter = StripePaymentAdapter::new(stripe_config(settings)).map_err(|e| {
                RegistryError::Init {
                    provider: STRIPE_PROVIDER_ID,
                    message: e.to_string(),
                }
            })?;
            registry.register(ProviderManifest::stripe(), Arc::new(adapter))?;
        }

        Ok(registry)
    }

    pub fn register(
        &mut self,
        manifest: ProviderManifest,
        provider: Arc<dyn PaymentProvider>,
    ) -> Result<(), RegistryError> {
        if manifest.id != provider.id() {
            return Err(RegistryError::IdMismatch {
                manifest: manifest.id,
                provider: provider.id(),
            });
        }
        if self.providers.contains_key(manifest.id) {
            return Err(RegistryError::Duplicate(manifest.id));
        }

        tracing::info!(provider = manifest.id, "Payment provider registered");
        self.providers
            .insert(manifest.id, RegisteredProvider { manifest, provider });
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn PaymentProvider>> {
        self.providers.get(id).map(|p| p.provider.clone())
    }

    /// Manifests of all registered providers, ordered by ID.
    pub fn manifests(&self) -> Vec<&ProviderManifest> {
        self.providers.values().map(|p| &p.manifest).collect()
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.providers.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

fn ping_config(settings: &PingSettings) -> PingConfig {
    let theme = PingTheme {
        brand_name: settings.brand_name.clone(),
        primary_color: settings.primary_color.clone(),
        logo_url: settings.logo_url.clone(),
    };

    let config = PingConfig::new(
        settings.base_url.clone(),
        settings.recipient_address.clone(),
        settings.recipient_chain_id.clone(),
    )
    .with_theme(theme)
    .with_timeout(Duration::from_secs(settings.request_timeout_secs));

    match &settings.webhook_secret {
        Some(secret) => config.with_webhook_secret(secret.clone()),
        None => config,
    }
}

fn stripe_config(settings: &StripeSettings) -> StripeConfig {
    let config = StripeConfig::new(settings.api_key.clone(), settings.webhook_secret.clone())
        .with_timeout(Duration::from_secs(settings.request_timeout_secs));

    match &settings.api_base_url {
        Some(url) => config.with_base_url(url.clone()),
        None => config,
    }
}
