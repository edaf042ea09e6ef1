/*!
 * Integration tests for the trend report workflow
 */

use anyhow::Result;
use std::fs;
use std::sync::Arc;

use tracesum::app_controller::{Controller, TrendOptions};
use tracesum::providers::mock::MockProvider;
use tracesum::sources::ScrapedPost;

use crate::common;

fn post(title: &str) -> ScrapedPost {
    ScrapedPost {
        title: title.to_string(),
        url: format!("https://www.reddit.com/r/rust/comments/{}/", title.to_lowercase()),
        text: format!("POST TITLE: {}\nCOMMENT: interesting\n", title),
    }
}

/// Test both passes and the written report
#[tokio::test]
async fn test_trend_report_from_posts_shouldMapPostsAndWriteReport() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let provider = MockProvider::with_handler(common::trend_handler);
    let controller = Controller::with_provider(common::test_config(temp_dir.path()), Arc::new(provider.clone()));
    let posts = vec![post("Cargo"), post("Tokio"), post("Weather")];

    let path = controller.trend_report_from_posts("rust", &posts, 3).await?.expect("report path");

    let file_name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("rust_trend_report_"));
    assert!(path.starts_with(temp_dir.path().join("reddit_trends")));

    let report = fs::read_to_string(&path)?;
    assert!(report.starts_with("# Trend Report for r/rust\n**Generated on:** "));
    assert!(report.contains("## Tooling\n\n**Summary:** Cargo and build tooling.\n\n**Contributing Posts:**\n*   [Cargo](https://www.reddit.com/r/rust/comments/cargo/)\n"));
    assert!(report.contains("*   [Tokio](https://www.reddit.com/r/rust/comments/tokio/)"));
    assert!(report.contains("## Editions\n\n**Summary:** Edition migrations.\n\n*No posts from the sample were strongly mapped to this trend.*"));
    assert!(!report.contains("[Weather]"));

    // one identification call plus one classification call per post
    assert_eq!(provider.call_count(), 4);
    Ok(())
}

/// Test that unparsable trends produce no report
#[tokio::test]
async fn test_trend_report_from_posts_withUnparsableTrends_shouldReturnNone() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let provider = MockProvider::scripted(["Here are some thoughts about the subreddit."]);
    let controller = Controller::with_provider(common::test_config(temp_dir.path()), Arc::new(provider.clone()));

    let result = controller.trend_report_from_posts("rust", &[post("Cargo")], 4).await?;

    assert!(result.is_none());
    assert_eq!(provider.call_count(), 1);
    assert!(!temp_dir.path().join("reddit_trends").exists());
    Ok(())
}

/// Test that missing Reddit credentials stop the workflow before any request
#[tokio::test]
async fn test_trend_report_withoutCredentials_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let provider = MockProvider::with_handler(common::trend_handler);
    let controller = Controller::with_provider(common::test_config(temp_dir.path()), Arc::new(provider.clone()));

    let error = controller.trend_report("rust", &TrendOptions::default()).await.unwrap_err();

    assert!(format!("{:#}", error).contains("Reddit is not configured"));
    assert_eq!(provider.call_count(), 0);
    Ok(())
}

/// Test that a bad time filter from the command line is rejected before any request
#[tokio::test]
async fn test_trend_report_withInvalidTimeFilter_shouldFailBeforeScraping() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let provider = MockProvider::with_handler(common::trend_handler);
    let controller = Controller::with_provider(common::test_config(temp_dir.path()), Arc::new(provider.clone()));
    let options = TrendOptions { time_filter: Some("fortnight".to_string()), ..Default::default() };

    let error = controller.trend_report("rust", &options).await.unwrap_err();

    assert!(format!("{:#}", error).contains("Invalid time filter 'fortnight'"));
    assert_eq!(provider.call_count(), 0);
    Ok(())
}

/// Test that a zero post limit is rejected
#[tokio::test]
async fn test_trend_report_withZeroLimit_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_provider(
        common::test_config(temp_dir.path()),
        Arc::new(MockProvider::with_handler(common::trend_handler)),
    );
    let options = TrendOptions { limit: Some(0), ..Default::default() };

    let error = controller.trend_report("rust", &options).await.unwrap_err();

    assert!(error.to_string().contains("must be positive"));
    Ok(())
}
