/*!
 * Tests for error types and conversions
 */

use tracesum::errors::{FetchError, ProviderError, SummaryError};

/// Test that pipeline errors name what went wrong
#[test]
fn test_summaryError_display_shouldDescribeLimit() {
    let error = SummaryError::DocumentTooLarge { actual: 2500, limit: 2000, unit: "sentences" };
    assert_eq!(error.to_string(), "Document too large: 2500 sentences exceeds the limit of 2000");
}

/// Test that provider faults render their detail
#[test]
fn test_providerError_display_shouldNameTimeout() {
    assert_eq!(ProviderError::Timeout(60).to_string(), "Request timed out after 60 seconds");
}

/// Test that I/O errors are kept as fetch errors
#[test]
fn test_fetchError_fromIo_shouldBeIoVariant() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    assert!(matches!(FetchError::from(io), FetchError::Io(_)));
}
