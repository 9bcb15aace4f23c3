//! Comparison module - options, constraints, and their normalized analysis.
//!
//! - `input` - validated user input
//! - `analysis` - normalized result types and read models
//! - `prompt` - neutral prompt construction
//! - `normalizer` - defensive parsing of completion text
//! - `errors` - service errors mapped to transport statuses

mod analysis;
mod errors;
mod input;
mod normalizer;
mod prompt;

pub use analysis::{
    ComparisonRecord, ComparisonStatus, ComparisonView, NormalizedResult, OptionAnalysis,
    StoredResult, TradeOff,
};
pub use errors::ServiceError;
pub use input::{ComparisonInput, MIN_CONSTRAINTS, MIN_OPTIONS};
pub use normalizer::{extract_json_payload, normalize, NormalizationError};
pub use prompt::{build_prompt, NO_WINNER_INSTRUCTION, SYSTEM_PROMPT};
