//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Commands (run a comparison) are separated from queries (load one).

pub mod handlers;

pub use handlers::{ExecuteComparisonCommand, ExecuteComparisonHandler, GetComparisonHandler};
