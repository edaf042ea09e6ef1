/*!
 * Error types for the tracesum application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The call did not finish within the caller-supplied timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
}

/// Errors raised by source providers before the pipeline starts
#[derive(Error, Debug)]
pub enum FetchError {
    /// The locator could not be understood (bad URL, bad post id)
    #[error("Invalid locator: {0}")]
    InvalidLocator(String),

    /// The document does not exist
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Transport failure talking to the source
    #[error("Network error: {0}")]
    Network(String),

    /// Credentials are missing or were rejected
    #[error("Credential error: {0}")]
    Credentials(String),

    /// Local read failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Terminal outcomes of the summarization pipeline
#[derive(Error, Debug)]
pub enum SummaryError {
    /// The sentence segmenter could not be initialized
    #[error("Sentence segmenter initialization failed: {0}")]
    SegmenterInit(String),

    /// Normalization left no sentences
    #[error("Nothing to summarize: no sentences detected")]
    NothingToSummarize,

    /// The document does not fit a single model request
    #[error("Document too large: {actual} {unit} exceeds the limit of {limit}")]
    DocumentTooLarge {
        /// Measured size
        actual: usize,
        /// Configured limit
        limit: usize,
        /// What was measured ("sentences" or "characters")
        unit: &'static str,
    },

    /// The selector produced no key sentence ids
    #[error("Could not extract key sentences")]
    NoKeySentences,
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}
