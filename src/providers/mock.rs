/*!
 * Mock provider implementations for testing.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockProvider::scripted(..)` - Returns canned responses in order
 * - `MockProvider::with_handler(..)` - Computes the response from the request
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::slow(..)` - Sleeps before answering (for timeout testing)
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::{CompletionRequest, CompletionResponse, Provider};

/// Computes a response from a request
pub type ResponseHandler = fn(&CompletionRequest) -> Result<String, ProviderError>;

/// Behavior mode for the mock provider
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Pops the next scripted response; errors when the script runs out
    Scripted,
    /// Delegates to a handler function
    Handler(ResponseHandler),
    /// Always fails with an error
    Failing,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64, text: String },
}

/// Mock provider for testing pipeline behavior without network access
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Remaining scripted responses
    script: Arc<Mutex<VecDeque<Result<String, String>>>>,
    /// Every request received, in call order
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer successive calls with the given texts
    pub fn scripted<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = Self::new(MockBehavior::Scripted);
        provider.script.lock().extend(responses.into_iter().map(|s| Ok(s.into())));
        provider
    }

    /// Queue a successful response
    pub fn then_respond(self, text: impl Into<String>) -> Self {
        self.script.lock().push_back(Ok(text.into()));
        self
    }

    /// Queue a failing response
    pub fn then_fail(self, message: impl Into<String>) -> Self {
        self.script.lock().push_back(Err(message.into()));
        self
    }

    /// Compute every response with `handler`
    pub fn with_handler(handler: ResponseHandler) -> Self {
        Self::new(MockBehavior::Handler(handler))
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that answers `text` after `delay_ms`
    pub fn slow(delay_ms: u64, text: impl Into<String>) -> Self {
        Self::new(MockBehavior::Slow { delay_ms, text: text.into() })
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Copy of every request received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        self.requests.lock().push(request.clone());

        let text = match &self.behavior {
            MockBehavior::Scripted => {
                let next = self.script.lock().pop_front();
                match next {
                    Some(Ok(text)) => text,
                    Some(Err(message)) => {
                        return Err(ProviderError::ApiError { status_code: 500, message });
                    }
                    None => {
                        return Err(ProviderError::RequestFailed("Mock script exhausted".to_string()));
                    }
                }
            }
            MockBehavior::Handler(handler) => handler(&request)?,
            MockBehavior::Failing => {
                return Err(ProviderError::ApiError {
                    message: "Simulated provider failure".to_string(),
                    status_code: 500,
                });
            }
            MockBehavior::Slow { delay_ms, text } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(*delay_ms)).await;
                text.clone()
            }
        };

        Ok(CompletionResponse {
            prompt_tokens: Some(request.user.len() as u64),
            completion_tokens: Some(text.len() as u64),
            text,
        })
    }

    async fn test_connection(&self, _model: &str) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError("Simulated connection failure".to_string())),
            _ => Ok(()),
        }
    }
}
