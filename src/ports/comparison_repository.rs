//! Comparison repository port.
//!
//! Persists comparison requests and their normalized results, keyed by an
//! opaque [`ComparisonId`].
//!
//! # Design
//!
//! - **Two writes per comparison**: the request is stored before the AI call,
//!   the result after normalization
//! - **No compensation**: a request without a result is a valid partial state
//! - **Pooled**: implementations share a connection pool, never a lock

use async_trait::async_trait;

use crate::domain::comparison::{ComparisonInput, ComparisonView, NormalizedResult};
use crate::domain::foundation::{ComparisonId, DomainError, Timestamp};

/// Repository port for comparison persistence.
#[async_trait]
pub trait ComparisonRepository: Send + Sync {
    /// Store a new comparison request and return its identifier.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn store_request(&self, input: &ComparisonInput) -> Result<ComparisonId, DomainError>;

    /// Store the normalized result for a previously stored request and return
    /// the creation timestamp exactly as persisted.
    ///
    /// # Errors
    ///
    /// - `ComparisonNotFound` if no request exists for `id`
    /// - `DatabaseError` on persistence failure
    async fn store_result(
        &self,
        id: &ComparisonId,
        result: &NormalizedResult,
    ) -> Result<Timestamp, DomainError>;

    /// Find a comparison by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &ComparisonId) -> Result<Option<ComparisonView>, DomainError>;
}
