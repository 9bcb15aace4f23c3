//! HTTP handlers for comparison endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::comparison::{
    ExecuteComparisonCommand, ExecuteComparisonHandler, GetComparisonHandler,
};
use crate::domain::comparison::{ComparisonInput, ServiceError};
use crate::domain::foundation::{ComparisonId, ValidationError};
use crate::ports::AIProvider;

use super::dto::{ComparisonResponse, CreateComparisonRequest, ErrorResponse, HealthResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ComparisonHandlers {
    execute_handler: Arc<ExecuteComparisonHandler>,
    get_handler: Arc<GetComparisonHandler>,
    ai_provider: Arc<dyn AIProvider>,
}

impl ComparisonHandlers {
    pub fn new(
        execute_handler: Arc<ExecuteComparisonHandler>,
        get_handler: Arc<GetComparisonHandler>,
        ai_provider: Arc<dyn AIProvider>,
    ) -> Self {
        Self {
            execute_handler,
            get_handler,
            ai_provider,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/comparisons - Run a comparison
pub async fn create_comparison(
    State(handlers): State<ComparisonHandlers>,
    body: Result<Json<CreateComparisonRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(rejection.body_text())),
            )
                .into_response()
        }
    };

    let input = match ComparisonInput::new(req.options, req.constraints) {
        Ok(input) => input,
        Err(errors) => return handle_service_error(ServiceError::Validation(errors)),
    };

    match handlers
        .execute_handler
        .handle(ExecuteComparisonCommand::new(input))
        .await
    {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => handle_service_error(e),
    }
}

/// GET /api/comparisons/:id - Get a stored comparison
pub async fn get_comparison(
    State(handlers): State<ComparisonHandlers>,
    Path(comparison_id): Path<String>,
) -> Response {
    let comparison_id = match comparison_id.parse::<ComparisonId>() {
        Ok(id) => id,
        Err(e) => {
            return handle_service_error(ServiceError::Validation(vec![
                ValidationError::invalid_format("id", e.to_string()),
            ]))
        }
    };

    match handlers.get_handler.handle(comparison_id).await {
        Ok(view) => {
            let response: ComparisonResponse = view.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_service_error(e),
    }
}

/// GET /health - Liveness plus completion service reachability
pub async fn health(State(handlers): State<ComparisonHandlers>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ai_available: handlers.ai_provider.check_availability().await,
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_service_error(error: ServiceError) -> Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match &error {
        ServiceError::Validation(_) | ServiceError::NotFound(_) => {
            tracing::debug!(error = %error, "Comparison request rejected");
        }
        _ => tracing::warn!(error = %error, status = status.as_u16(), "Comparison request failed"),
    }

    (status, Json(ErrorResponse::from(&error))).into_response()
}
