//! Comparison command and query handlers.

mod execute_comparison;
mod get_comparison;

pub use execute_comparison::{
    ExecuteComparisonCommand, ExecuteComparisonHandler, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
pub use get_comparison::GetComparisonHandler;
