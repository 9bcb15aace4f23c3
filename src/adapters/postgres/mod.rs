//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresComparisonRepository` - comparison requests and results as JSONB

mod comparison_repository;

pub use comparison_repository::PostgresComparisonRepository;
