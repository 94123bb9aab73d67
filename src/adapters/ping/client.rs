//! HTTP binding for the Ping checkout API.
//!
//! Thin wrapper over `reqwest`: one method per endpoint, JSON in and out.
//! The remote API is the source of truth for pricing and validation, so no
//! request field is checked here.

use std::time::Duration;

use secrecy::SecretString;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::ports::{PaymentError, PaymentErrorCode};

use super::types::{
    CreateSessionRequest, CreateSessionResponse, GetSessionResponse, PingRecipient,
    PingResponse, PingTheme,
};

/// Default request timeout for Ping API calls.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Ping provider configuration.
///
/// Passed explicitly to the client and service at construction.
#[derive(Debug, Clone)]
pub struct PingConfig {
    /// Base URL of the Ping API (e.g. `https://api.ping.example/v1`).
    base_url: String,

    /// Address that receives checkout funds.
    recipient_address: String,

    /// Chain the recipient address lives on.
    recipient_chain_id: String,

    /// Branding for the hosted checkout page.
    theme: PingTheme,

    /// Hex-encoded shared secret for webhook signatures.
    webhook_secret: Option<SecretString>,

    request_timeout: Duration,
}

impl PingConfig {
    /// Create a new Ping configuration.
    pub fn new(
        base_url: impl Into<String>,
        recipient_address: impl Into<String>,
        recipient_chain_id: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            recipient_address: recipient_address.into(),
            recipient_chain_id: recipient_chain_id.into(),
            theme: PingTheme::default(),
            webhook_secret: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_theme(mut self, theme: PingTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the hex-encoded webhook secret.
    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(SecretString::new(secret.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn recipient(&self) -> PingRecipient {
        PingRecipient {
            address: self.recipient_address.clone(),
            chain_id: self.recipient_chain_id.clone(),
        }
    }

    pub fn theme(&self) -> &PingTheme {
        &self.theme
    }

    pub fn webhook_secret(&self) -> Option<&SecretString> {
        self.webhook_secret.as_ref()
    }
}

/// Errors from the Ping HTTP API.
#[derive(Debug, Error)]
pub enum PingApiError {
    /// Base URL cannot be combined with an endpoint path.
    #[error("Invalid Ping base URL: {0}")]
    InvalidUrl(String),

    /// Request never produced a response.
    #[error("Request to Ping failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Ping answered with a non-success status.
    #[error("Ping API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape.
    #[error("Failed to parse Ping response: {0}")]
    Decode(String),
}

impl PingApiError {
    /// Converts to the port-level error, keeping the HTTP status as provider code.
    pub fn into_payment_error(self) -> PaymentError {
        let message = self.to_string();
        match self {
            PingApiError::Transport(_) => PaymentError::network(message),
            PingApiError::Status { status: 404, .. } => {
                PaymentError::new(PaymentErrorCode::NotFound, message).with_provider_code("404")
            }
            PingApiError::Status { status, .. } => {
                PaymentError::provider(message).with_provider_code(status.to_string())
            }
            PingApiError::Decode(_) => PaymentError::provider(message),
            PingApiError::InvalidUrl(_) => {
                PaymentError::new(PaymentErrorCode::NotConfigured, message)
            }
        }
    }
}

/// Raw HTTP client for one Ping deployment.
#[derive(Clone)]
pub struct PingClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl PingClient {
    /// Create a client from the provider configuration.
    pub fn new(config: &PingConfig) -> Result<Self, PingApiError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            base_url: config.base_url.clone(),
            http_client,
        })
    }

    /// `GET /ping` health probe.
    pub async fn ping(&self) -> Result<PingResponse, PingApiError> {
        let url = self.endpoint(&["ping"])?;
        self.send(self.http_client.get(url), "GET /ping").await
    }

    /// `POST /checkout/sessions`.
    pub async fn create_checkout_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<CreateSessionResponse, PingApiError> {
        let url = self.endpoint(&["checkout", "sessions"])?;
        self.send(
            self.http_client.post(url).json(request),
            "POST /checkout/sessions",
        )
        .await
    }

    /// `GET /checkout/sessions/{id}`.
    pub async fn get_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<GetSessionResponse, PingApiError> {
        let url = self.endpoint(&["checkout", "sessions", session_id])?;
        self.send(self.http_client.get(url), "GET /checkout/sessions/{id}")
            .await
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url, PingApiError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| PingApiError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| PingApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        operation: &'static str,
    ) -> Result<T, PingApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(operation, error = %e, "Ping request failed");
            PingApiError::Transport(e)
        })?;

        let status = response.status();
        tracing::debug!(operation, status = status.as_u16(), "Ping API responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                operation,
                status = status.as_u16(),
                body = %body,
                "Ping API returned error status"
            );
            return Err(PingApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| PingApiError::Decode(e.to_string()))
    }
}
