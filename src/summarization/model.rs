/*!
 * The language-model capability used by the summarization pipeline.
 *
 * The pipeline needs exactly two operations from a model: pick key sentence
 * ids, and rewrite cited sentences. [`SummaryModel`] is that narrow interface;
 * [`LlmSummaryModel`] implements it over any [`Provider`]. Tests substitute
 * either a mock provider or their own `SummaryModel`.
 */

use async_trait::async_trait;
use log::debug;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{Config, SummarizationConfig};
use crate::errors::ProviderError;
use crate::providers::{complete_with_timeout, CompletionRequest, Provider};

use super::prompts;
use super::selector::parse_key_sentence_ids;

/// Two-operation model boundary of the traceable summary
#[async_trait]
pub trait SummaryModel: Send + Sync {
    /// Return the ids of roughly `target` key sentences from an annotated block
    async fn select(&self, annotated_block: &str, target: usize) -> Result<Vec<String>, ProviderError>;

    /// Rewrite `[id] text` lines into a narrative with citation tags
    async fn synthesize(&self, cited_sentences: &[String]) -> Result<String, ProviderError>;
}

/// Selection is always deterministic
pub const SELECTOR_TEMPERATURE: f32 = 0.0;

/// Per-call model settings
#[derive(Debug, Clone)]
pub struct SummaryModelSettings {
    pub selector_model: String,
    pub synthesizer_model: String,
    pub synthesizer_temperature: f32,
    pub timeout: Duration,
}

impl SummaryModelSettings {
    pub fn from_config(summarization: &SummarizationConfig, timeout_secs: u64) -> Self {
        Self {
            selector_model: summarization.selector_model.clone(),
            synthesizer_model: summarization.synthesizer_model.clone(),
            synthesizer_temperature: summarization.synthesizer_temperature,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl Default for SummaryModelSettings {
    fn default() -> Self {
        Self::from_config(&SummarizationConfig::default(), 60)
    }
}

/// `SummaryModel` backed by a completion provider
#[derive(Debug, Clone)]
pub struct LlmSummaryModel {
    provider: Arc<dyn Provider>,
    settings: SummaryModelSettings,
}

impl LlmSummaryModel {
    pub fn new(provider: Arc<dyn Provider>, settings: SummaryModelSettings) -> Self {
        Self { provider, settings }
    }

    pub fn from_config(provider: Arc<dyn Provider>, config: &Config) -> Self {
        Self::new(provider, SummaryModelSettings::from_config(&config.summarization, config.get_timeout_secs()))
    }
}

#[async_trait]
impl SummaryModel for LlmSummaryModel {
    async fn select(&self, annotated_block: &str, target: usize) -> Result<Vec<String>, ProviderError> {
        let request = CompletionRequest::new(
            &self.settings.selector_model,
            prompts::SELECTOR_SYSTEM,
            prompts::selector_prompt(annotated_block, target),
        )
        .temperature(SELECTOR_TEMPERATURE)
        .json_output();

        let response = complete_with_timeout(self.provider.as_ref(), request, self.settings.timeout).await?;
        debug!(
            "Selector response ({:?} prompt / {:?} completion tokens): {}",
            response.prompt_tokens, response.completion_tokens, response.text
        );
        parse_key_sentence_ids(&response.text)
    }

    async fn synthesize(&self, cited_sentences: &[String]) -> Result<String, ProviderError> {
        let request = CompletionRequest::new(
            &self.settings.synthesizer_model,
            prompts::SYNTHESIZER_SYSTEM,
            prompts::synthesizer_prompt(cited_sentences),
        )
        .temperature(self.settings.synthesizer_temperature);

        let response = complete_with_timeout(self.provider.as_ref(), request, self.settings.timeout).await?;
        debug!(
            "Synthesizer response ({:?} prompt / {:?} completion tokens)",
            response.prompt_tokens, response.completion_tokens
        );
        Ok(response.text.trim().to_string())
    }
}
