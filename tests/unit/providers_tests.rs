/*!
 * Tests for the provider boundary
 */

use std::time::Duration;
use tracesum::app_config::{Config, ModelProvider};
use tracesum::errors::ProviderError;
use tracesum::providers::mock::MockProvider;
use tracesum::providers::{build_provider, complete_with_timeout, CompletionRequest, Provider};

fn request() -> CompletionRequest {
    CompletionRequest::new("gpt-4.1-nano", "system", "user").temperature(0.0)
}

/// Test that a fast provider answers within the deadline
#[tokio::test]
async fn test_complete_with_timeout_withFastProvider_shouldReturnText() {
    let provider = MockProvider::scripted(["hello"]);

    let response = complete_with_timeout(&provider, request(), Duration::from_secs(1)).await.unwrap();

    assert_eq!(response.text, "hello");
    assert_eq!(provider.call_count(), 1);
}

/// Test that a slow provider becomes a timeout fault
#[tokio::test]
async fn test_complete_with_timeout_withSlowProvider_shouldTimeOut() {
    let provider = MockProvider::slow(1_000, "late");

    let result = complete_with_timeout(&provider, request(), Duration::from_millis(10)).await;

    assert!(matches!(result, Err(ProviderError::Timeout(_))));
}

/// Test that scripted failures surface as API errors
#[tokio::test]
async fn test_mock_withScriptedFailure_shouldFailThenRecover() {
    let provider = MockProvider::scripted(Vec::<String>::new())
        .then_fail("overloaded")
        .then_respond("ok");

    assert!(matches!(
        provider.complete(request()).await,
        Err(ProviderError::ApiError { status_code: 500, .. })
    ));
    assert_eq!(provider.complete(request()).await.unwrap().text, "ok");
    assert!(provider.complete(request()).await.is_err());
}

/// Test that every configured provider kind can be built
#[test]
fn test_build_provider_forEveryKind_shouldSucceed() {
    for kind in [ModelProvider::OpenAI, ModelProvider::Anthropic, ModelProvider::Ollama, ModelProvider::LMStudio] {
        let mut config = Config::default();
        config.provider = kind;
        let provider = build_provider(&config);
        assert!(!format!("{:?}", provider).is_empty());
    }
}
