//! HTTP routes for comparison endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{create_comparison, get_comparison, health, ComparisonHandlers};

/// Creates the comparison router, mounted under `/api/comparisons`.
pub fn comparison_routes(handlers: ComparisonHandlers) -> Router {
    Router::new()
        .route("/", post(create_comparison))
        .route("/:id", get(get_comparison))
        .with_state(handlers)
}

/// Creates the health router.
pub fn health_routes(handlers: ComparisonHandlers) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(handlers)
}
