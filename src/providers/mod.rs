/*!
 * Provider implementations for the language-model boundary.
 *
 * This module contains client implementations for various LLM providers:
 * - OpenAI: OpenAI API integration (also used for LM Studio)
 * - Anthropic: Anthropic API integration
 * - Ollama: Local LLM server
 * - Mock: scripted provider for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{Config, ModelProvider};
use crate::errors::ProviderError;

/// A single text-completion call, independent of any vendor wire format
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Opaque model identifier
    pub model: String,
    /// System instruction
    pub system: String,
    /// User instruction
    pub user: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Ask the provider for a JSON object as the whole response
    pub json_output: bool,
    /// Optional cap on generated tokens
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: system.into(),
            user: user.into(),
            temperature: 0.0,
            json_output: false,
            max_tokens: None,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn json_output(mut self) -> Self {
        self.json_output = true;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Text body returned by a provider
#[derive(Debug, Clone, Default)]
pub struct CompletionResponse {
    /// Generated text
    pub text: String,
    /// Prompt tokens reported by the provider
    pub prompt_tokens: Option<u64>,
    /// Completion tokens reported by the provider
    pub completion_tokens: Option<u64>,
}

impl CompletionResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably behind `Arc<dyn Provider>`.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<CompletionResponse, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self, model: &str) -> Result<(), ProviderError>;
}

/// Run a completion with a hard deadline.
///
/// An elapsed deadline is reported as `ProviderError::Timeout` so callers treat it
/// like any other boundary fault.
pub async fn complete_with_timeout(
    provider: &dyn Provider,
    request: CompletionRequest,
    timeout: Duration,
) -> Result<CompletionResponse, ProviderError> {
    match tokio::time::timeout(timeout, provider.complete(request)).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout(timeout.as_secs())),
    }
}

/// Build the configured provider client
pub fn build_provider(config: &Config) -> Arc<dyn Provider> {
    let settings = config.active_provider();
    let endpoint = config.get_endpoint();

    match config.provider {
        ModelProvider::OpenAI => Arc::new(openai::OpenAI::new_with_config(
            settings.api_key,
            endpoint,
            settings.retry_count,
            settings.retry_backoff_ms,
        )),
        ModelProvider::LMStudio => {
            // LM Studio often doesn't require an API key; use a placeholder if empty
            let api_key = if settings.api_key.is_empty() {
                "lm-studio".to_string()
            } else {
                settings.api_key
            };
            Arc::new(openai::OpenAI::new_with_config(
                api_key,
                endpoint,
                settings.retry_count,
                settings.retry_backoff_ms,
            ))
        }
        ModelProvider::Anthropic => Arc::new(anthropic::Anthropic::new_with_config(
            settings.api_key,
            endpoint,
            settings.retry_count,
            settings.retry_backoff_ms,
        )),
        ModelProvider::Ollama => Arc::new(ollama::Ollama::new_with_config(
            endpoint,
            settings.retry_count,
            settings.retry_backoff_ms,
        )),
    }
}

/// Backoff before retry number `attempt` (1-based)
pub(crate) fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
    let factor = 1u64 << attempt.saturating_sub(1).min(10);
    Duration::from_millis(base_ms.saturating_mul(factor))
}

/// Map an HTTP error status to a provider error
pub(crate) fn status_error(status: reqwest::StatusCode, body: String) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::AuthenticationError(body),
        429 => ProviderError::RateLimitExceeded(body),
        code => ProviderError::ApiError { status_code: code, message: body },
    }
}

/// Whether a failed call is worth another attempt
pub(crate) fn is_retryable(error: &ProviderError) -> bool {
    match error {
        ProviderError::RateLimitExceeded(_) | ProviderError::ConnectionError(_) => true,
        ProviderError::ApiError { status_code, .. } => *status_code >= 500,
        _ => false,
    }
}

pub mod openai;
pub mod anthropic;
pub mod ollama;
pub mod mock;
