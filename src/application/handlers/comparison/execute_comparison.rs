//! ExecuteComparisonHandler - Runs one comparison end to end.
//!
//! Persist request, build prompt, complete, normalize, persist result.
//! The first failing step ends the run. Nothing is rolled back: a stored
//! request without a result is an accepted partial state.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::domain::comparison::{
    build_prompt, normalize, ComparisonInput, ComparisonRecord, ServiceError, SYSTEM_PROMPT,
};
use crate::ports::{AIError, AIProvider, ComparisonRepository, CompletionRequest};

/// Default completion length budget.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Command to run a comparison.
#[derive(Debug, Clone)]
pub struct ExecuteComparisonCommand {
    pub input: ComparisonInput,
    /// Caller-side cancellation, forwarded to the completion call.
    pub cancellation: Option<CancellationToken>,
}

impl ExecuteComparisonCommand {
    pub fn new(input: ComparisonInput) -> Self {
        Self {
            input,
            cancellation: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Handler for running comparisons.
pub struct ExecuteComparisonHandler {
    repository: Arc<dyn ComparisonRepository>,
    ai_provider: Arc<dyn AIProvider>,
    max_tokens: u32,
    temperature: f32,
}

impl ExecuteComparisonHandler {
    pub fn new(repository: Arc<dyn ComparisonRepository>, ai_provider: Arc<dyn AIProvider>) -> Self {
        Self {
            repository,
            ai_provider,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Overrides the generation parameters sent with every completion.
    pub fn with_generation(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    pub async fn handle(
        &self,
        cmd: ExecuteComparisonCommand,
    ) -> Result<ComparisonRecord, ServiceError> {
        // 1. Persist the request
        let id = self
            .repository
            .store_request(&cmd.input)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to store comparison request");
                ServiceError::PersistenceFailure(e.to_string())
            })?;

        tracing::info!(
            comparison_id = %id,
            options = cmd.input.options().len(),
            constraints = cmd.input.constraints().len(),
            "Comparison request stored"
        );

        // 2. Build the prompt
        let prompt = build_prompt(cmd.input.options(), cmd.input.constraints());

        let mut request = CompletionRequest::new(prompt)
            .with_system_prompt(SYSTEM_PROMPT)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);
        if let Some(token) = cmd.cancellation {
            request = request.with_cancellation(token);
        }

        // 3. Complete
        let response = self
            .ai_provider
            .complete(request)
            .await
            .map_err(|e| {
                tracing::error!(comparison_id = %id, error = %e, "Completion failed");
                map_ai_error(e)
            })?;

        tracing::debug!(
            comparison_id = %id,
            model = %response.model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "Completion received"
        );

        // 4. Normalize
        let result = normalize(&response.content).map_err(|e| {
            tracing::warn!(comparison_id = %id, error = %e, "Completion could not be normalized");
            ServiceError::NormalizationFailure(e.to_string())
        })?;

        // 5. Persist the result
        let created_at = self
            .repository
            .store_result(&id, &result)
            .await
            .map_err(|e| {
                tracing::error!(comparison_id = %id, error = %e, "Failed to store comparison result");
                ServiceError::PersistenceFailure(e.to_string())
            })?;

        tracing::info!(
            comparison_id = %id,
            options = result.options.len(),
            trade_offs = result.trade_offs.len(),
            "Comparison completed"
        );

        // 6. Return the record
        Ok(ComparisonRecord::new(id, result, created_at))
    }
}

fn map_ai_error(error: AIError) -> ServiceError {
    match error {
        AIError::Configuration(message) => ServiceError::Internal(message),
        other @ (AIError::Unavailable { .. } | AIError::MalformedResponse(_) | AIError::Cancelled) => {
            ServiceError::AiUnavailable(other.to_string())
        }
    }
}
