//! GetComparisonHandler - Query handler for a stored comparison.

use std::sync::Arc;

use crate::domain::comparison::{ComparisonView, ServiceError};
use crate::domain::foundation::ComparisonId;
use crate::ports::ComparisonRepository;

/// Handler for retrieving comparisons.
pub struct GetComparisonHandler {
    repository: Arc<dyn ComparisonRepository>,
}

impl GetComparisonHandler {
    pub fn new(repository: Arc<dyn ComparisonRepository>) -> Self {
        Self { repository }
    }

    /// Returns the stored request and, when present, its result.
    pub async fn handle(&self, id: ComparisonId) -> Result<ComparisonView, ServiceError> {
        self.repository
            .find_by_id(&id)
            .await
            .map_err(|e| {
                tracing::error!(comparison_id = %id, error = %e, "Failed to load comparison");
                ServiceError::PersistenceFailure(e.to_string())
            })?
            .ok_or(ServiceError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryComparisonRepository;
    use crate::domain::comparison::{ComparisonInput, ComparisonStatus};

    #[tokio::test]
    async fn returns_pending_view_for_request_without_result() {
        let repository = InMemoryComparisonRepository::new();
        let input =
            ComparisonInput::new(vec!["A".to_string(), "B".to_string()], vec!["cost".to_string()])
                .unwrap();
        let id = repository.store_request(&input).await.unwrap();

        let view = GetComparisonHandler::new(Arc::new(repository))
            .handle(id)
            .await
            .unwrap();

        assert_eq!(view.id, id);
        assert_eq!(view.input, input);
        assert_eq!(view.status(), ComparisonStatus::Pending);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let handler = GetComparisonHandler::new(Arc::new(InMemoryComparisonRepository::new()));
        let id = ComparisonId::new();

        let err = handler.handle(id).await.unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(found) if found == id));
        assert_eq!(err.status_code(), 404);
    }
}
