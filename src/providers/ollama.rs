use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use super::{backoff_delay, is_retryable, status_error, CompletionRequest, CompletionResponse, Provider};

/// Ollama client for interacting with Ollama API
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Generation options for the Ollama API
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation (default: 0.8)
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Chat message object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant, or tool)
    pub role: String,
    /// Content of the message
    pub content: String,
}

/// Chat request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model name to use for generation
    model: String,
    /// Messages of the conversation
    messages: Vec<ChatMessage>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Format to return a response in
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Chat response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Model name
    pub model: String,
    /// Response message
    pub message: ChatMessage,
    /// Whether the generation is complete
    pub done: bool,
    /// Number of prompt tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

/// Version response from the Ollama API
#[derive(Debug, Deserialize)]
pub struct VersionResponse {
    pub version: String,
}

impl ChatRequest {
    /// Create a new chat request
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            options: None,
            format: None,
            stream: Some(false),
        }
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).temperature = Some(temperature);
        self
    }

    /// Cap the number of generated tokens
    pub fn num_predict(mut self, num_predict: u32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).num_predict = Some(num_predict);
        self
    }

    /// Set the format
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Translate a provider-neutral request into an Ollama chat request
    pub fn from_completion(request: &CompletionRequest) -> Self {
        let messages = vec![
            ChatMessage { role: "system".to_string(), content: request.system.clone() },
            ChatMessage { role: "user".to_string(), content: request.user.clone() },
        ];
        let mut wire = Self::new(&request.model, messages).temperature(request.temperature);
        if let Some(max_tokens) = request.max_tokens {
            wire = wire.num_predict(max_tokens);
        }
        if request.json_output {
            wire = wire.format("json");
        }
        wire
    }
}

impl Ollama {
    /// Create a new Ollama client with default retry settings
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::new_with_config(endpoint, 3, 1000)
    }

    /// Create a new Ollama client with configuration
    ///
    /// Note: Ollama typically uses HTTP/1.1, so we don't force HTTP/2.
    pub fn new_with_config(endpoint: impl Into<String>, max_retries: u32, backoff_base_ms: u64) -> Self {
        let endpoint = endpoint.into();
        let base_url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", endpoint.trim_end_matches('/'))
        };

        Self {
            base_url,
            client: Client::builder()
                .timeout(Duration::from_secs(600))
                .http1_only()
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send_once(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let url = format!("{}/api/chat", self.base_url);
        let response = self.client.post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to send request to Ollama API: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Ollama API error ({}): {}", status, error_text);
            return Err(status_error(status, error_text));
        }

        let response_text = response.text().await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to read Ollama response: {}", e)))?;
        Self::parse_chat_body(&response_text)
    }

    /// Parse a chat body, accepting a JSONL stream if the server ignored `stream: false`
    pub fn parse_chat_body(body: &str) -> Result<ChatResponse, ProviderError> {
        if let Ok(response) = serde_json::from_str::<ChatResponse>(body) {
            return Ok(response);
        }

        let chunks: Vec<ChatResponse> = body.lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str::<ChatResponse>(line).ok())
            .collect();
        let last = chunks.last().ok_or_else(|| {
            let preview: String = body.chars().take(500).collect();
            ProviderError::ParseError(format!("Unrecognized Ollama response: {}", preview))
        })?;

        let content: String = chunks.iter().map(|c| c.message.content.as_str()).collect();
        Ok(ChatResponse {
            model: last.model.clone(),
            message: ChatMessage { role: "assistant".to_string(), content },
            done: last.done,
            prompt_eval_count: last.prompt_eval_count,
            eval_count: last.eval_count,
        })
    }

    /// Chat with the Ollama API with retry logic
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let mut attempt = 0;
        loop {
            match self.send_once(&request).await {
                Ok(response) => return Ok(response),
                Err(e) if attempt < self.max_retries && is_retryable(&e) => {
                    attempt += 1;
                    let delay = backoff_delay(self.backoff_base_ms, attempt);
                    warn!("Ollama request failed ({}), retry {}/{} in {:?}", e, attempt, self.max_retries, delay);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Get the Ollama server version
    pub async fn version(&self) -> Result<String, ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response = self.client.get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status();
            return Err(status_error(status, response.text().await.unwrap_or_default()));
        }
        let version = response.json::<VersionResponse>().await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        Ok(version.version)
    }
}

#[async_trait]
impl Provider for Ollama {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        debug!("Ollama request: model={} json={} temperature={}", request.model, request.json_output, request.temperature);
        let response = self.chat(ChatRequest::from_completion(&request)).await?;
        Ok(CompletionResponse {
            text: response.message.content,
            prompt_tokens: response.prompt_eval_count,
            completion_tokens: response.eval_count,
        })
    }

    async fn test_connection(&self, _model: &str) -> Result<(), ProviderError> {
        self.version().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_withoutScheme_shouldAddHttp() {
        let client = Ollama::new("localhost:11434/");
        assert_eq!(client.base_url(), "http://localhost:11434");
    }

    #[test]
    fn test_fromCompletion_withJsonMode_shouldSetFormat() {
        let request = CompletionRequest::new("llama3", "s", "u").json_output().temperature(0.0);
        let wire = serde_json::to_value(ChatRequest::from_completion(&request)).unwrap();

        assert_eq!(wire["format"], "json");
        assert_eq!(wire["stream"], false);
        assert_eq!(wire["options"]["temperature"], 0.0);
        assert_eq!(wire["messages"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_parseChatBody_withStreamedLines_shouldConcatenateContent() {
        let body = concat!(
            r#"{"model":"m","message":{"role":"assistant","content":"Hel"},"done":false}"#, "\n",
            r#"{"model":"m","message":{"role":"assistant","content":"lo"},"done":true,"eval_count":2}"#, "\n",
        );
        let response = Ollama::parse_chat_body(body).unwrap();
        assert_eq!(response.message.content, "Hello");
        assert!(response.done);
        assert_eq!(response.eval_count, Some(2));
    }

    #[test]
    fn test_parseChatBody_withGarbage_shouldReturnParseError() {
        let result = Ollama::parse_chat_body("<html>oops</html>");
        assert!(matches!(result, Err(ProviderError::ParseError(_))));
    }
}
