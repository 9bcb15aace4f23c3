//! HTTP DTOs for comparison endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::domain::comparison::{
    ComparisonStatus, ComparisonView, OptionAnalysis, ServiceError, TradeOff,
};
use crate::domain::foundation::Timestamp;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to run a comparison.
///
/// Missing fields deserialize as empty so they surface as field-level
/// validation errors instead of a body rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComparisonRequest {
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Stored comparison, with its result once one exists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResponse {
    pub id: String,
    pub status: ComparisonStatus,
    pub options: Vec<String>,
    pub constraints: Vec<String>,
    pub requested_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ComparisonResultResponse>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResultResponse {
    pub options: Vec<OptionAnalysis>,
    pub trade_offs: Vec<TradeOff>,
    pub created_at: Timestamp,
}

impl From<ComparisonView> for ComparisonResponse {
    fn from(view: ComparisonView) -> Self {
        let status = view.status();
        Self {
            id: view.id.to_string(),
            status,
            options: view.input.options().to_vec(),
            constraints: view.input.constraints().to_vec(),
            requested_at: view.requested_at,
            result: view.result.map(|stored| ComparisonResultResponse {
                options: stored.result.options,
                trade_offs: stored.result.trade_offs,
                created_at: stored.created_at,
            }),
        }
    }
}

/// Health report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub ai_available: bool,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<&ServiceError> for ErrorResponse {
    fn from(error: &ServiceError) -> Self {
        let fields = error.field_messages();
        Self {
            code: error.code().to_string(),
            message: error.public_message(),
            details: if fields.is_empty() {
                None
            } else {
                Some(serde_json::json!({ "fields": fields }))
            },
        }
    }
}
