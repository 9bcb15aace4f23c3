//! PostgreSQL implementation of ComparisonRepository.
//!
//! Requests and results live in separate tables so a request without a
//! result survives a failed completion.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::domain::comparison::{
    ComparisonInput, ComparisonView, NormalizedResult, OptionAnalysis, StoredResult, TradeOff,
};
use crate::domain::foundation::{ComparisonId, DomainError, ErrorCode, Timestamp};
use crate::ports::ComparisonRepository;

/// PostgreSQL implementation of ComparisonRepository.
#[derive(Clone)]
pub struct PostgresComparisonRepository {
    pool: PgPool,
}

impl PostgresComparisonRepository {
    /// Creates a new PostgresComparisonRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ComparisonRepository for PostgresComparisonRepository {
    async fn store_request(&self, input: &ComparisonInput) -> Result<ComparisonId, DomainError> {
        let id = ComparisonId::new();

        sqlx::query(
            r#"
            INSERT INTO comparison_requests (id, options, constraints, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id.as_uuid())
        .bind(Json(input.options()))
        .bind(Json(input.constraints()))
        .bind(Timestamp::now().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert comparison request: {}", e),
            )
        })?;

        Ok(id)
    }

    async fn store_result(
        &self,
        id: &ComparisonId,
        result: &NormalizedResult,
    ) -> Result<Timestamp, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO comparison_results (comparison_id, options, trade_offs, created_at)
            SELECT id, $2, $3, $4 FROM comparison_requests WHERE id = $1
            RETURNING created_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(Json(&result.options))
        .bind(Json(&result.trade_offs))
        .bind(Timestamp::now().as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert comparison result: {}", e),
            )
        })?;

        // No row back means the SELECT matched no request.
        let row = row.ok_or_else(|| {
            DomainError::new(
                ErrorCode::ComparisonNotFound,
                "Cannot store a result without its request",
            )
            .with_detail("comparison_id", id.to_string())
        })?;

        let created_at: chrono::DateTime<chrono::Utc> = column(&row, "created_at")?;
        Ok(Timestamp::from_datetime(created_at))
    }

    async fn find_by_id(&self, id: &ComparisonId) -> Result<Option<ComparisonView>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT r.id, r.options, r.constraints, r.created_at,
                   res.options AS result_options,
                   res.trade_offs AS result_trade_offs,
                   res.created_at AS result_created_at
            FROM comparison_requests r
            LEFT JOIN comparison_results res ON res.comparison_id = r.id
            WHERE r.id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch comparison: {}", e),
            )
        })?;

        row.map(row_to_view).transpose()
    }
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get {}: {}", name, e),
        )
    })
}

fn row_to_view(row: PgRow) -> Result<ComparisonView, DomainError> {
    let id: uuid::Uuid = column(&row, "id")?;
    let Json(options): Json<Vec<String>> = column(&row, "options")?;
    let Json(constraints): Json<Vec<String>> = column(&row, "constraints")?;
    let requested_at: chrono::DateTime<chrono::Utc> = column(&row, "created_at")?;

    let result_options: Option<Json<Vec<OptionAnalysis>>> = column(&row, "result_options")?;
    let result_trade_offs: Option<Json<Vec<TradeOff>>> = column(&row, "result_trade_offs")?;
    let result_created_at: Option<chrono::DateTime<chrono::Utc>> =
        column(&row, "result_created_at")?;

    let result = match (result_options, result_trade_offs, result_created_at) {
        (Some(Json(options)), Some(Json(trade_offs)), Some(created_at)) => Some(StoredResult {
            result: NormalizedResult {
                options,
                trade_offs,
            },
            created_at: Timestamp::from_datetime(created_at),
        }),
        _ => None,
    };

    Ok(ComparisonView {
        id: ComparisonId::from_uuid(id),
        input: rebuild_input(options, constraints)?,
        requested_at: Timestamp::from_datetime(requested_at),
        result,
    })
}

/// Re-validates stored input. A row that no longer validates is corrupt.
fn rebuild_input(
    options: Vec<String>,
    constraints: Vec<String>,
) -> Result<ComparisonInput, DomainError> {
    ComparisonInput::new(options, constraints).map_err(|errors| {
        let reasons: Vec<String> = errors.iter().map(ToString::to_string).collect();
        DomainError::new(
            ErrorCode::InternalError,
            format!("Stored comparison input is invalid: {}", reasons.join("; ")),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebuild_input_accepts_stored_entries() {
        let input = rebuild_input(
            vec!["Postgres".to_string(), "MongoDB".to_string()],
            vec!["cost".to_string()],
        )
        .unwrap();

        assert_eq!(input.options(), ["Postgres", "MongoDB"]);
        assert_eq!(input.constraints(), ["cost"]);
    }

    #[test]
    fn rebuild_input_rejects_corrupt_rows() {
        let err = rebuild_input(vec!["only".to_string()], vec![]).unwrap_err();

        assert_eq!(err.code, ErrorCode::InternalError);
        assert!(err.message.contains("options"));
        assert!(err.message.contains("constraints"));
    }
}
