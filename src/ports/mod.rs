//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - completion service with internal retries
//! - `ComparisonRepository` - persistence of requests and results

mod ai_provider;
mod comparison_repository;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo, TokenUsage,
};
pub use comparison_repository::ComparisonRepository;
