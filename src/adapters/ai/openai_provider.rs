//! OpenAI Provider - Implementation of AIProvider for OpenAI-compatible APIs.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_base_url("https://api.openai.com/v1")
//!     .with_max_retries(3);
//!
//! let provider = OpenAIProvider::new(config)?;
//! ```
//!
//! # Retries
//!
//! Each call makes up to `max_retries` attempts. Transport failures, 429 and
//! 5xx statuses are retried after `base_delay * 2^(attempt - 1)`. Any other
//! non-success status fails immediately, as does a success response without
//! message content.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo, TokenUsage,
};

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Configuration for the OpenAI provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gpt-4o-mini").
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Maximum number of attempts, the first one included.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent retry.
    pub base_delay: Duration,
}

impl OpenAIConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the per-attempt request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum number of attempts.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the base backoff delay.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Delay to wait after the given failed attempt (1-indexed).
pub fn backoff_delay(base_delay: Duration, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    base_delay.saturating_mul(1u32 << exponent)
}

/// Failure of a single attempt, before retry classification.
#[derive(Debug, thiserror::Error)]
enum AttemptError {
    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("network error: {0}")]
    Network(String),

    #[error("status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Malformed(String),
}

impl AttemptError {
    fn is_retryable(&self) -> bool {
        match self {
            AttemptError::Timeout(_) | AttemptError::Network(_) => true,
            AttemptError::Status { status, .. } => is_retryable_status(*status),
            AttemptError::Malformed(_) => false,
        }
    }
}

/// 429 and 5xx are transient. Every other non-success status is fatal.
pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || status >= 500
}

/// OpenAI-compatible chat completions provider.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    /// Creates a new OpenAI provider with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `AIError::Configuration` if the API key is blank or the HTTP
    /// client cannot be built. No network call is made.
    pub fn new(config: OpenAIConfig) -> Result<Self, AIError> {
        if config.api_key().trim().is_empty() {
            return Err(AIError::Configuration("API key is not set".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Builds the model listing endpoint URL.
    fn models_url(&self) -> String {
        format!("{}/models", self.config.base_url)
    }

    /// Converts our request to OpenAI's format.
    fn to_openai_request(&self, request: &CompletionRequest) -> OpenAIRequest {
        let mut messages = Vec::with_capacity(2);

        if let Some(ref prompt) = request.system_prompt {
            messages.push(OpenAIMessage {
                role: "system".to_string(),
                content: prompt.clone(),
            });
        }

        messages.push(OpenAIMessage {
            role: "user".to_string(),
            content: request.prompt.clone(),
        });

        OpenAIRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    /// Runs one attempt: send, check status, parse.
    async fn attempt(&self, body: &OpenAIRequest) -> Result<CompletionResponse, AttemptError> {
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let response = Self::check_status(response).await?;
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        Self::parse_response(&text)
    }

    fn transport_error(&self, error: reqwest::Error) -> AttemptError {
        if error.is_timeout() {
            AttemptError::Timeout(self.config.timeout.as_secs())
        } else if error.is_connect() {
            AttemptError::Network(format!("Connection failed: {}", error))
        } else {
            AttemptError::Network(error.to_string())
        }
    }

    /// Passes successful responses through and turns the rest into status errors.
    async fn check_status(response: Response) -> Result<Response, AttemptError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body: String = response
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect();

        Err(AttemptError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Parses a successful response body.
    fn parse_response(body: &str) -> Result<CompletionResponse, AttemptError> {
        let openai_response: OpenAIResponse = serde_json::from_str(body)
            .map_err(|e| AttemptError::Malformed(format!("Failed to parse response: {}", e)))?;

        let content = openai_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                AttemptError::Malformed("Response contained no message content".to_string())
            })?;

        let usage = openai_response
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            model: openai_response.model.unwrap_or_default(),
            usage,
        })
    }
}

/// Runs `future` unless `token` fires first.
async fn cancellable<F, T>(token: Option<&CancellationToken>, future: F) -> Result<T, AIError>
where
    F: Future<Output = T>,
{
    match token {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(AIError::Cancelled),
            output = future => Ok(output),
        },
        None => Ok(future.await),
    }
}

#[async_trait]
impl AIProvider for OpenAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let body = self.to_openai_request(&request);
        let token = request.cancellation.as_ref();
        let max_attempts = self.config.max_retries.max(1);
        let mut attempt = 1;

        loop {
            let failure = match cancellable(token, self.attempt(&body)).await? {
                Ok(response) => {
                    tracing::debug!(
                        attempt,
                        model = %response.model,
                        total_tokens = response.usage.total_tokens,
                        "Completion succeeded"
                    );
                    return Ok(response);
                }
                Err(AttemptError::Malformed(message)) => {
                    tracing::warn!(attempt, %message, "Completion response was malformed");
                    return Err(AIError::MalformedResponse(message));
                }
                Err(failure) => failure,
            };

            if !failure.is_retryable() {
                tracing::warn!(attempt, error = %failure, "Completion failed with fatal error");
                return Err(AIError::unavailable(attempt, failure.to_string()));
            }

            if attempt >= max_attempts {
                tracing::error!(attempt, error = %failure, "Completion retries exhausted");
                return Err(AIError::unavailable(attempt, failure.to_string()));
            }

            let delay = backoff_delay(self.config.base_delay, attempt);
            tracing::warn!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %failure,
                "Completion attempt failed, retrying"
            );
            cancellable(token, sleep(delay)).await?;
            attempt += 1;
        }
    }

    async fn check_availability(&self) -> bool {
        let result = self
            .client
            .get(self.models_url())
            .bearer_auth(self.config.api_key())
            .timeout(PROBE_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Availability probe failed: {}", e);
                false
            }
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openai", &self.config.model)
    }
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    model: Option<String>,
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: Option<OpenAIResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
