/*!
 * Integration tests for the summary workflows
 */

use anyhow::Result;
use std::fs;
use std::sync::Arc;

use tracesum::app_controller::Controller;
use tracesum::providers::mock::MockProvider;
use tracesum::sources::{LocalFileSource, SourceDocument, SourceKind};

use crate::common;

/// Test the full local-file workflow: fetch, summarize, write the report
#[tokio::test]
async fn test_summarize_path_withReadme_shouldWriteTwoPartReport() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "README.md", common::SAMPLE_README)?;
    let provider = MockProvider::with_handler(common::summary_handler);
    let controller = Controller::with_provider(common::test_config(temp_dir.path()), Arc::new(provider.clone()));

    let outcome = controller.summarize_path(&input, false).await?;

    assert_eq!(outcome.processed, 1);
    let report = fs::read_to_string(temp_dir.path().join("file_summaries").join("README_summary.md"))?;
    assert!(report.starts_with("# Detailed Summary for README\n"));
    assert!(report.contains(&format!("**Source URL:** {}", input.display())));
    assert!(report.contains("* **`S1`**: Demo Demo is a tiny tool for counting words."));
    assert!(report.contains("* **`S2`**: It reads text from standard input."));
    assert!(report.ends_with("## Part 2: Final Summary (with Citations)\n\nDemo counts words from standard input. [S1, S2]"));

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].json_output);
    assert!(requests[1].user.contains("[S1] Demo Demo is a tiny tool"));
    Ok(())
}

/// Test that unknown selector ids skip synthesis but still deliver Part 1
#[tokio::test]
async fn test_summarize_path_withOnlyUnknownIds_shouldWritePartOneOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "notes.md", "First point. Second point. Third point.")?;
    let provider = MockProvider::with_handler(common::unknown_ids_handler);
    let controller = Controller::with_provider(common::test_config(temp_dir.path()), Arc::new(provider.clone()));

    let outcome = controller.summarize_path(&input, false).await?;

    assert_eq!(outcome.processed, 1);
    let report = fs::read_to_string(temp_dir.path().join("file_summaries").join("notes_summary.md"))?;
    assert!(report.contains("## Part 1"));
    assert!(!report.contains("## Part 2"));
    assert!(!report.contains("S40"));
    assert_eq!(provider.call_count(), 1);
    Ok(())
}

/// Test that a synthesizer fault still delivers the extractive part
#[tokio::test]
async fn test_summarize_path_withSynthesizerFault_shouldWritePartOneOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "README.md", common::SAMPLE_README)?;
    let provider = MockProvider::with_handler(common::failing_synthesizer_handler);
    let controller = Controller::with_provider(common::test_config(temp_dir.path()), Arc::new(provider.clone()));

    let outcome = controller.summarize_path(&input, false).await?;

    assert_eq!(outcome.processed, 1);
    let report = fs::read_to_string(temp_dir.path().join("file_summaries").join("README_summary.md"))?;
    assert!(report.contains("## Part 1"));
    assert!(report.contains("* **`S1`**: Demo Demo is a tiny tool for counting words."));
    assert!(!report.contains("## Part 2"));
    assert_eq!(provider.call_count(), 2);
    Ok(())
}

/// Test that a document without sentences fails with a diagnostic
#[tokio::test]
async fn test_summarize_document_withEmptyText_shouldFailWithContext() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let provider = MockProvider::with_handler(common::summary_handler);
    let controller = Controller::with_provider(common::test_config(temp_dir.path()), Arc::new(provider.clone()));
    let document = SourceDocument {
        name: "empty".to_string(),
        locator: "empty.md".to_string(),
        title: None,
        text: "<!-- nothing -->".to_string(),
        kind: SourceKind::LocalFile,
    };

    let error = controller.summarize_document(&document, temp_dir.path()).await.unwrap_err();

    let message = format!("{:#}", error);
    assert!(message.contains("Summarization of empty.md failed"));
    assert!(message.contains("Nothing to summarize"));
    assert_eq!(provider.call_count(), 0);
    assert!(!temp_dir.path().join("empty_summary.md").exists());
    Ok(())
}

/// Test that a failing selector aborts without writing a report
#[tokio::test]
async fn test_summarize_source_withFailingProvider_shouldNotWriteReport() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "notes.txt", "First point. Second point.")?;
    let controller = Controller::with_provider(common::test_config(temp_dir.path()), Arc::new(MockProvider::failing()));
    let out = temp_dir.path().join("out");

    let result = controller.summarize_source(&LocalFileSource, &input.to_string_lossy(), &out).await;

    assert!(format!("{:#}", result.unwrap_err()).contains("Could not extract key sentences"));
    assert!(!out.exists());
    Ok(())
}

/// Test that a missing file is reported as a fetch failure
#[tokio::test]
async fn test_summarize_path_withMissingFile_shouldNameFetchStep() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_provider(
        common::test_config(temp_dir.path()),
        Arc::new(MockProvider::with_handler(common::summary_handler)),
    );

    let error = controller.summarize_path(&temp_dir.path().join("missing.md"), false).await.unwrap_err();

    assert!(format!("{:#}", error).contains("Fetching"));
    Ok(())
}

/// Test folder mode: every document is processed, existing reports are skipped
#[tokio::test]
async fn test_summarize_folder_withExistingReport_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let docs = temp_dir.path().join("docs");
    fs::create_dir_all(&docs)?;
    common::create_test_file(&docs, "alpha.md", "Alpha one. Alpha two.")?;
    common::create_test_file(&docs, "beta.txt", "Beta one. Beta two.")?;
    common::create_test_file(&docs, "ignored.png", "binary")?;

    let provider = MockProvider::with_handler(common::summary_handler);
    let controller = Controller::with_provider(common::test_config(temp_dir.path()), Arc::new(provider.clone()));

    let first = controller.summarize_path(&docs, false).await?;
    assert_eq!((first.processed, first.skipped, first.failed), (2, 0, 0));
    assert!(temp_dir.path().join("file_summaries").join("alpha_summary.md").exists());
    assert!(temp_dir.path().join("file_summaries").join("beta_summary.md").exists());

    let second = controller.summarize_path(&docs, false).await?;
    assert_eq!((second.processed, second.skipped), (0, 2));

    let forced = controller.summarize_path(&docs, true).await?;
    assert_eq!(forced.processed, 2);
    assert_eq!(provider.call_count(), 8);
    Ok(())
}

/// Test that a folder without documents is an error
#[tokio::test]
async fn test_summarize_folder_withoutDocuments_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let empty = temp_dir.path().join("empty");
    fs::create_dir_all(&empty)?;
    let controller = Controller::with_provider(
        common::test_config(temp_dir.path()),
        Arc::new(MockProvider::with_handler(common::summary_handler)),
    );

    assert!(controller.summarize_folder(&empty, false).await.is_err());
    Ok(())
}

/// Test the provider preflight check
#[tokio::test]
async fn test_test_connection_withFailingProvider_shouldNameProvider() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let ok = Controller::with_provider(
        common::test_config(temp_dir.path()),
        Arc::new(MockProvider::with_handler(common::summary_handler)),
    );
    let failing = Controller::with_provider(common::test_config(temp_dir.path()), Arc::new(MockProvider::failing()));

    assert!(ok.test_connection().await.is_ok());
    assert!(format!("{:#}", failing.test_connection().await.unwrap_err()).contains("Cannot reach Ollama"));
    Ok(())
}
