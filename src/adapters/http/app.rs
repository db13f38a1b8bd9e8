//! Top-level router: every endpoint module plus the shared middleware stack.

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::medical::{medical_router, MedicalAppState};
use super::payment::{payment_router, PaymentAppState};
use super::system::{system_router, SystemAppState};

/// Multipart framing on top of the raw upload.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Middleware settings for the assembled application.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Allowed CORS origins; empty allows any origin.
    pub cors_origins: Vec<String>,
    pub request_timeout: Duration,
    /// Largest accepted upload in bytes.
    pub max_upload_bytes: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            request_timeout: Duration::from_secs(90),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// State for every endpoint module.
#[derive(Clone)]
pub struct AppStates {
    pub medical: MedicalAppState,
    pub payment: PaymentAppState,
    pub system: SystemAppState,
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Builds the complete application router.
pub fn app_router(states: AppStates, settings: &HttpSettings) -> Router {
    Router::new()
        .merge(system_router().with_state(states.system))
        .merge(medical_router().with_state(states.medical))
        .merge(payment_router().with_state(states.payment))
        .layer(DefaultBodyLimit::max(
            settings.max_upload_bytes + MULTIPART_OVERHEAD_BYTES,
        ))
        .layer(cors_layer(&settings.cors_origins))
        .layer(TimeoutLayer::new(settings.request_timeout))
        .layer(TraceLayer::new_for_http())
}
