//! Service-level errors for the comparison pipeline.

use thiserror::Error;

use crate::domain::foundation::{ComparisonId, ValidationError};

const RETRY_MESSAGE: &str =
    "We couldn't generate a comparison right now. Please try again in a moment.";
const INTERNAL_MESSAGE: &str = "An internal error occurred. Please try again later.";

/// Failure of a comparison operation.
///
/// Created at the point of failure and propagated unchanged to the boundary.
/// `Display` carries diagnostic detail for logs; [`ServiceError::public_message`]
/// is what callers see.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("validation failed: {}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    #[error("AI service unavailable: {0}")]
    AiUnavailable(String),

    #[error("normalization failed: {0}")]
    NormalizationFailure(String),

    #[error("persistence failed: {0}")]
    PersistenceFailure(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("comparison not found: {0}")]
    NotFound(ComparisonId),
}

impl ServiceError {
    /// Transport status code for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::AiUnavailable(_) | ServiceError::NormalizationFailure(_) => 502,
            ServiceError::PersistenceFailure(_) | ServiceError::Internal(_) => 500,
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "VALIDATION_FAILED",
            ServiceError::AiUnavailable(_) => "AI_UNAVAILABLE",
            ServiceError::NormalizationFailure(_) => "NORMALIZATION_FAILED",
            ServiceError::PersistenceFailure(_) => "PERSISTENCE_FAILED",
            ServiceError::Internal(_) => "INTERNAL_ERROR",
            ServiceError::NotFound(_) => "NOT_FOUND",
        }
    }

    /// Message safe to show to the caller. Never includes upstream detail.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Validation(errors) => {
                format!("Invalid comparison request: {}", join_messages(errors))
            }
            ServiceError::AiUnavailable(_) | ServiceError::NormalizationFailure(_) => {
                RETRY_MESSAGE.to_string()
            }
            ServiceError::PersistenceFailure(_) | ServiceError::Internal(_) => {
                INTERNAL_MESSAGE.to_string()
            }
            ServiceError::NotFound(id) => format!("Comparison not found: {}", id),
        }
    }

    /// Field-level messages for validation failures, empty otherwise.
    pub fn field_messages(&self) -> Vec<String> {
        match self {
            ServiceError::Validation(errors) => errors.iter().map(ToString::to_string).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<Vec<ValidationError>> for ServiceError {
    fn from(errors: Vec<ValidationError>) -> Self {
        ServiceError::Validation(errors)
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_each_variant_to_its_status() {
        assert_eq!(ServiceError::Validation(vec![]).status_code(), 400);
        assert_eq!(ServiceError::AiUnavailable("x".into()).status_code(), 502);
        assert_eq!(
            ServiceError::NormalizationFailure("x".into()).status_code(),
            502
        );
        assert_eq!(ServiceError::PersistenceFailure("x".into()).status_code(), 500);
        assert_eq!(ServiceError::Internal("x".into()).status_code(), 500);
        assert_eq!(ServiceError::NotFound(ComparisonId::new()).status_code(), 404);
    }

    #[test]
    fn public_message_hides_upstream_detail() {
        let ai = ServiceError::AiUnavailable("connect ECONNREFUSED 10.0.0.1:443".into());
        assert!(!ai.public_message().contains("10.0.0.1"));
        assert!(ai.to_string().contains("10.0.0.1"));

        let db = ServiceError::PersistenceFailure("relation does not exist".into());
        assert!(!db.public_message().contains("relation"));
    }

    #[test]
    fn validation_lists_every_field() {
        let err = ServiceError::from(vec![
            ValidationError::too_few_items("options", 2, 1),
            ValidationError::empty_field("constraints[0]"),
        ]);

        assert_eq!(err.field_messages().len(), 2);
        assert!(err.public_message().contains("options"));
        assert!(err.public_message().contains("constraints[0]"));
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(ServiceError::AiUnavailable("x".into()).code(), "AI_UNAVAILABLE");
        assert_eq!(
            ServiceError::NormalizationFailure("x".into()).code(),
            "NORMALIZATION_FAILED"
        );
    }
}
