/*!
 * Common test utilities for the tracesum test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use tracesum::app_config::{Config, ModelProvider};
use tracesum::errors::ProviderError;
use tracesum::providers::CompletionRequest;
use tracesum::trends::prompts::CLASSIFICATION_SYSTEM;

/// A small README with headings, a list, a link and a code block
pub const SAMPLE_README: &str = r#"# Demo

Demo is a tiny tool for counting words. It reads text from standard input.

## Usage

Run `demo < file.txt` to count the words of a file. See the [manual](https://example.com/manual) for flags.

- Fast startup.
- No configuration needed.

```
demo --version
```
"#;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Configuration for a keyless local provider with every report below `root`
pub fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.provider = ModelProvider::Ollama;
    config.output.rebase(root);
    config
}

/// Answers the selector with `S1` and `S2` and the synthesizer with a cited recap
pub fn summary_handler(request: &CompletionRequest) -> Result<String, ProviderError> {
    if request.json_output {
        Ok(r#"{"key_sentence_ids": ["S1", "S2"]}"#.to_string())
    } else {
        Ok("Demo counts words from standard input. [S1, S2]".to_string())
    }
}

/// Answers the selector with an id no document here has
pub fn unknown_ids_handler(request: &CompletionRequest) -> Result<String, ProviderError> {
    if request.json_output {
        Ok(r#"{"key_sentence_ids": ["S40"]}"#.to_string())
    } else {
        Ok("Should never be asked. [S40]".to_string())
    }
}

/// Answers the selector normally and fails every synthesizer call
pub fn failing_synthesizer_handler(request: &CompletionRequest) -> Result<String, ProviderError> {
    if request.json_output {
        summary_handler(request)
    } else {
        Err(ProviderError::ApiError { status_code: 503, message: "overloaded".to_string() })
    }
}

/// Answers trend identification with two trends and assigns posts by title
pub fn trend_handler(request: &CompletionRequest) -> Result<String, ProviderError> {
    if request.system == CLASSIFICATION_SYSTEM {
        let answer = if request.user.contains("POST TITLE: Cargo") {
            "1"
        } else if request.user.contains("POST TITLE: Tokio") {
            "2"
        } else {
            "None"
        };
        return Ok(answer.to_string());
    }

    Ok("Trend Title: Tooling\nSummary: Cargo and build tooling.\n---\n\
Trend Title: Async\nSummary: Runtimes and executors.\n---\n\
Trend Title: Editions\nSummary: Edition migrations.\n---"
        .to_string())
}
