//! rostra/crates/rostra-api/src/middleware.rs
//!
//! Standard layers for the Rostra API: request tracing and CORS.

use std::time::Duration;

use axum::http::Method;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Per-request tracing with the default span/event scheme.
pub fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}

// Configures CORS (Cross-Origin Resource Sharing)
// Important if the UI and API ever live on different subdomains.
pub fn cors_policy() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600))
}
