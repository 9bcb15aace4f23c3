//! HTTP adapters - REST API implementations.
//!
//! Exposes the comparison pipeline and a health probe over axum.

pub mod comparison;

use std::time::Duration;

use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use comparison::{comparison_routes, health_routes, ComparisonHandlers};

/// Builds the full application router with its middleware stack.
///
/// `request_timeout` bounds each request; when it fires the handler future is
/// dropped, which aborts any in-flight completion attempt.
pub fn api_router(
    handlers: ComparisonHandlers,
    request_timeout: Duration,
    cors_origins: &[String],
) -> Router {
    Router::new()
        .nest("/api/comparisons", comparison_routes(handlers.clone()))
        .merge(health_routes(handlers))
        .layer(cors_layer(cors_origins))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<axum::http::HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if parsed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(parsed))
    }
}
