//! Completion service configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use crate::adapters::ai::OpenAIConfig;

use super::error::ValidationError;

/// Completion service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Bearer credential for the completion endpoint
    pub api_key: Option<Secret<String>>,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name sent with every completion
    #[serde(default = "default_model")]
    pub model: String,

    /// Per-attempt timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Total attempts, the first one included
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Delay before the first retry in milliseconds
    #[serde(default = "default_base_delay")]
    pub base_delay_ms: u64,

    /// Completion length budget
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Check if a non-blank API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    /// Builds the provider configuration.
    pub fn provider_config(&self) -> Result<OpenAIConfig, ValidationError> {
        let api_key = self
            .api_key
            .as_ref()
            .filter(|_| self.has_api_key())
            .ok_or(ValidationError::MissingRequired("AI__API_KEY"))?;

        Ok(OpenAIConfig::new(api_key.expose_secret().clone())
            .with_model(self.model.clone())
            .with_base_url(self.base_url.clone())
            .with_timeout(self.timeout())
            .with_max_retries(self.max_retries)
            .with_base_delay(self.base_delay()))
    }

    /// Validate completion service configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired("AI__API_KEY"));
        }
        if self.max_retries == 0 {
            return Err(ValidationError::InvalidRetryCount);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            base_delay_ms: default_base_delay(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> u32 {
    3
}

fn default_base_delay() -> u64 {
    1000
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_temperature() -> f32 {
    0.7
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key() -> AiConfig {
        AiConfig {
            api_key: Some(Secret::new("sk-test".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.base_delay(), Duration::from_millis(1000));
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.max_tokens, 2000);
    }

    #[test]
    fn test_missing_or_blank_key_is_rejected() {
        assert!(matches!(
            AiConfig::default().validate(),
            Err(ValidationError::MissingRequired(_))
        ));

        let blank = AiConfig {
            api_key: Some(Secret::new("   ".to_string())),
            ..Default::default()
        };
        assert!(!blank.has_api_key());
        assert!(blank.provider_config().is_err());
    }

    #[test]
    fn test_zero_retries_is_rejected() {
        let config = AiConfig {
            max_retries: 0,
            ..with_key()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidRetryCount)
        ));
    }

    #[test]
    fn test_temperature_range() {
        let config = AiConfig {
            temperature: 2.5,
            ..with_key()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidTemperature)
        ));
        assert!(with_key().validate().is_ok());
    }

    #[test]
    fn test_provider_config_carries_settings() {
        let config = AiConfig {
            model: "gpt-4o".to_string(),
            base_url: "http://localhost:9000/v1/".to_string(),
            max_retries: 5,
            base_delay_ms: 250,
            ..with_key()
        };

        let provider = config.provider_config().unwrap();
        assert_eq!(provider.model, "gpt-4o");
        assert_eq!(provider.base_url, "http://localhost:9000/v1");
        assert_eq!(provider.max_retries, 5);
        assert_eq!(provider.base_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let rendered = format!("{:?}", with_key());
        assert!(!rendered.contains("sk-test"));
    }
}
