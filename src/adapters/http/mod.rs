//! HTTP adapters - REST API implementations.

pub mod payments;

pub use payments::payments_router;
pub use payments::PaymentsAppState;

use std::future::Future;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Webhook bodies and checkout requests are small.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Builds the full application router with middleware, mounted under `/api`.
pub fn create_app(state: PaymentsAppState, server: &ServerConfig) -> Router {
    Router::new()
        .nest("/api", payments_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(server.request_timeout()))
                .layer(cors_layer(&server.allowed_origins()))
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

fn cors_layer(origins: &[&str]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(allowed)
    }
}

/// Resolves when `signal` fires, for use with `with_graceful_shutdown`.
///
/// A signal listener that fails to install never resolves, so the server
/// keeps running instead of shutting down at startup.
pub async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
