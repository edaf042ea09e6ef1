/*!
 * # tracesum - Traceable summaries with sentence-level citations
 *
 * A Rust library for summarizing documents so that every claim of the summary
 * can be traced back to the sentences it came from.
 *
 * ## Features
 *
 * - Summarize GitHub READMEs, Reddit posts and local Markdown/text files
 * - Two model passes:
 *   - Extractive: pick key sentences by identifier (`S1`, `S2`, ...)
 *   - Abstractive: rewrite them into prose citing those identifiers
 * - Post-hoc verification of citation tags
 * - Subreddit trend reports (trend identification + post classification)
 * - Works with several model providers:
 *   - OpenAI API (and OpenAI-compatible LM Studio)
 *   - Anthropic API
 *   - Ollama (local LLM)
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `summarization`: The traceable summary pipeline:
 *   - `summarization::normalizer`: Markup to plain text
 *   - `summarization::indexer`: Sentence identifiers
 *   - `summarization::selector` / `summarization::synthesizer`: Model passes
 *   - `summarization::report`: Markdown output
 * - `sources`: Document fetching (GitHub, Reddit, local files)
 * - `trends`: Subreddit trend report
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `providers`: Client implementations for various LLM providers:
 *   - `providers::ollama`: Ollama API client
 *   - `providers::openai`: OpenAI API client
 *   - `providers::anthropic`: Anthropic API client
 *   - `providers::mock`: Scripted provider for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod providers;
pub mod sources;
pub mod summarization;
pub mod trends;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{FetchError, ProviderError, SummaryError};
pub use sources::{SourceDocument, SourceKind, SourceProvider};
pub use summarization::{SummarizationPipeline, TraceableSummary};
