/*!
 * Tests for application configuration
 */

use anyhow::Result;
use tracesum::app_config::{Config, LogLevel, ModelProvider};

/// Test that the default configuration round-trips through JSON
#[test]
fn test_default_config_serialization_shouldPreserveValues() -> Result<()> {
    let config = Config::default();

    let json = serde_json::to_string_pretty(&config)?;
    let parsed: Config = serde_json::from_str(&json)?;

    assert_eq!(parsed.provider, ModelProvider::OpenAI);
    assert_eq!(parsed.summarization.selector_model, "gpt-4.1-nano");
    assert_eq!(parsed.summarization.synthesizer_temperature, 0.5);
    assert_eq!(parsed.trends.classification_model, "gpt-4.1-mini");
    assert_eq!(parsed.log_level, LogLevel::Info);
    Ok(())
}

/// Test that a hosted provider without a key is rejected
#[test]
fn test_validate_withHostedProviderAndNoKey_shouldFail() {
    let config = Config::default();
    let error = config.validate().unwrap_err();
    assert!(error.to_string().contains("API key"));
}

/// Test that environment keys make the default configuration valid
#[test]
fn test_validate_afterEnvOverride_shouldSucceed() {
    let mut config = Config::default();
    config.apply_env_overrides(|key| (key == "OPENAI_API_KEY").then(|| "sk-test".to_string()));
    assert!(config.validate().is_ok());
}

/// Test that out-of-range temperatures are rejected
#[test]
fn test_validate_withTemperatureOutOfRange_shouldFail() {
    let mut config = Config::default();
    config.provider = ModelProvider::Ollama;
    config.summarization.synthesizer_temperature = 3.5;
    assert!(config.validate().is_err());
}

/// Test that inverted policy bounds are rejected
#[test]
fn test_validate_withInvertedPolicyBounds_shouldFail() {
    let mut config = Config::default();
    config.provider = ModelProvider::LMStudio;
    config.summarization.min_key_sentences = 50;
    assert!(config.validate().is_err());
}

/// Test that local providers get a longer timeout
#[test]
fn test_timeout_forLocalProvider_shouldBeLonger() {
    let mut config = Config::default();
    assert_eq!(config.get_timeout_secs(), 60);
    config.provider = ModelProvider::Ollama;
    assert_eq!(config.get_timeout_secs(), 180);
}

/// Test that rebasing moves every output directory
#[test]
fn test_rebase_shouldMoveAllOutputDirectories() {
    let mut config = Config::default();
    config.output.rebase("/tmp/out");

    assert_eq!(config.output.repo_dir, std::path::Path::new("/tmp/out/repo_summaries"));
    assert_eq!(config.output.reddit_dir, std::path::Path::new("/tmp/out/reddit_summaries"));
    assert_eq!(config.output.trends_dir, std::path::Path::new("/tmp/out/reddit_trends"));
    assert_eq!(config.output.file_dir, std::path::Path::new("/tmp/out/file_summaries"));
}

/// Test that rebasing keeps directory names set in the configuration file
#[test]
fn test_rebase_withCustomDirectories_shouldKeepTheirNames() {
    let mut config = Config::default();
    config.output.repo_dir = "reports/github".into();
    config.output.trends_dir = "/var/lib/tracesum/weekly_trends".into();
    config.output.rebase("/tmp/out");

    assert_eq!(config.output.repo_dir, std::path::Path::new("/tmp/out/github"));
    assert_eq!(config.output.trends_dir, std::path::Path::new("/tmp/out/weekly_trends"));
    assert_eq!(config.output.file_dir, std::path::Path::new("/tmp/out/file_summaries"));
}

/// Test that a selector temperature left in an older file is ignored
#[test]
fn test_parse_withSelectorTemperature_shouldStillLoad() -> Result<()> {
    let parsed: Config = serde_json::from_str(
        r#"{"provider": "ollama", "summarization": {"selector_temperature": 0.9, "synthesizer_temperature": 0.7}}"#,
    )?;

    assert_eq!(parsed.summarization.synthesizer_temperature, 0.7);
    assert!(!serde_json::to_string(&parsed)?.contains("selector_temperature"));
    Ok(())
}

/// Test the shared time filter check
#[test]
fn test_validateTimeFilter_shouldAcceptOnlyRedditWindows() {
    assert!(tracesum::app_config::validate_time_filter("month").is_ok());
    let error = tracesum::app_config::validate_time_filter("fortnight").unwrap_err();
    assert!(error.to_string().contains("Invalid time filter 'fortnight'"));
}
