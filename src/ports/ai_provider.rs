//! AI Provider Port - Interface for LLM completion services.
//!
//! This port abstracts the external completion endpoint so the comparison
//! pipeline can request completions without coupling to a specific vendor.
//!
//! # Design
//!
//! - One prompt in, one text payload out
//! - Retries and backoff live inside the implementation, never above it
//! - Errors distinguish exhausted/fatal upstream failures from malformed
//!   responses and caller cancellation
//! - A cheap availability probe for health reporting

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Port for AI/LLM completion services.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Generate a single completion.
    ///
    /// Implementations retry transient failures internally. Callers must not
    /// retry on error.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;

    /// Lightweight connectivity probe. Returns false on any error, never fails.
    async fn check_availability(&self) -> bool;

    /// Get provider information (name, model).
    fn provider_info(&self) -> ProviderInfo;
}

/// Request for AI completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// The user prompt.
    pub prompt: String,
    /// System prompt to guide model behavior.
    pub system_prompt: Option<String>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// Caller-side cancellation. Aborts the in-flight attempt and any backoff.
    pub cancellation: Option<CancellationToken>,
}

impl CompletionRequest {
    /// Creates a new completion request for the given prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: None,
            max_tokens: None,
            temperature: None,
            cancellation: None,
        }
    }

    /// Sets the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Sets the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Attaches a cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Response from AI completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated content. Never empty.
    pub content: String,
    /// Model that generated the response.
    pub model: String,
    /// Token usage reported by the provider.
    pub usage: TokenUsage,
}

/// Token usage information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion).
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Creates new token usage.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Provider information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "openai").
    pub name: String,
    /// Model identifier.
    pub model: String,
}

impl ProviderInfo {
    /// Creates new provider info.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// AI provider errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AIError {
    /// Retries exhausted, or the provider answered with a fatal status.
    #[error("provider unavailable after {attempts} attempt(s): {message}")]
    Unavailable {
        /// Attempts made before giving up.
        attempts: u32,
        /// Last underlying failure.
        message: String,
    },

    /// The provider answered successfully but without usable content.
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),

    /// The caller cancelled the request.
    #[error("completion request cancelled by caller")]
    Cancelled,

    /// Missing credential or unusable client configuration.
    #[error("provider misconfigured: {0}")]
    Configuration(String),
}

impl AIError {
    /// Creates an unavailable error.
    pub fn unavailable(attempts: u32, message: impl Into<String>) -> Self {
        Self::Unavailable {
            attempts,
            message: message.into(),
        }
    }

    /// Creates a malformed response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }
}
