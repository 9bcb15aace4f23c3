//! HTTP adapter for comparison endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ComparisonResponse, ComparisonResultResponse, CreateComparisonRequest, ErrorResponse,
    HealthResponse,
};
pub use handlers::ComparisonHandlers;
pub use routes::{comparison_routes, health_routes};
