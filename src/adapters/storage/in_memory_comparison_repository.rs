//! In-Memory Comparison Repository
//!
//! Stores comparison requests and results in memory.
//! Useful for testing and local development without a database.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::comparison::{ComparisonInput, ComparisonView, NormalizedResult, StoredResult};
use crate::domain::foundation::{ComparisonId, DomainError, ErrorCode, Timestamp};
use crate::ports::ComparisonRepository;

/// In-memory storage for comparisons
#[derive(Debug, Clone, Default)]
pub struct InMemoryComparisonRepository {
    comparisons: Arc<RwLock<HashMap<ComparisonId, ComparisonView>>>,
    fail_requests: Arc<AtomicBool>,
    fail_results: Arc<AtomicBool>,
}

impl InMemoryComparisonRepository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `store_request` fail (for failure-path tests)
    pub fn fail_requests(&self, fail: bool) {
        self.fail_requests.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `store_result` fail (for failure-path tests)
    pub fn fail_results(&self, fail: bool) {
        self.fail_results.store(fail, Ordering::SeqCst);
    }

    /// Number of stored requests
    pub async fn request_count(&self) -> usize {
        self.comparisons.read().await.len()
    }

    /// Number of stored results
    pub async fn result_count(&self) -> usize {
        self.comparisons
            .read()
            .await
            .values()
            .filter(|view| view.result.is_some())
            .count()
    }
}

#[async_trait]
impl ComparisonRepository for InMemoryComparisonRepository {
    async fn store_request(&self, input: &ComparisonInput) -> Result<ComparisonId, DomainError> {
        if self.fail_requests.load(Ordering::SeqCst) {
            return Err(DomainError::database("Simulated request store failure"));
        }

        let id = ComparisonId::new();
        let view = ComparisonView {
            id,
            input: input.clone(),
            requested_at: Timestamp::now(),
            result: None,
        };
        self.comparisons.write().await.insert(id, view);
        Ok(id)
    }

    async fn store_result(
        &self,
        id: &ComparisonId,
        result: &NormalizedResult,
    ) -> Result<Timestamp, DomainError> {
        if self.fail_results.load(Ordering::SeqCst) {
            return Err(DomainError::database("Simulated result store failure"));
        }

        let mut comparisons = self.comparisons.write().await;
        let view = comparisons.get_mut(id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::ComparisonNotFound,
                format!("Comparison not found: {}", id),
            )
        })?;

        let created_at = Timestamp::now();
        view.result = Some(StoredResult {
            result: result.clone(),
            created_at,
        });
        Ok(created_at)
    }

    async fn find_by_id(&self, id: &ComparisonId) -> Result<Option<ComparisonView>, DomainError> {
        Ok(self.comparisons.read().await.get(id).cloned())
    }
}
