/*!
 * Tests for the summarization pipeline with a substituted model
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use tracesum::errors::{ProviderError, SummaryError};
use tracesum::summarization::normalizer::normalize_markup;
use tracesum::summarization::{
    render_report, DocumentLimits, LengthPolicy, SummarizationPipeline, SummaryModel,
};

use crate::common;

/// SummaryModel double recording what the pipeline asked for
#[derive(Default)]
struct RecordingModel {
    ids: Vec<String>,
    narrative: Option<String>,
    targets: Mutex<Vec<usize>>,
    synthesized: Mutex<Vec<Vec<String>>>,
}

#[async_trait]
impl SummaryModel for RecordingModel {
    async fn select(&self, _annotated_block: &str, target: usize) -> Result<Vec<String>, ProviderError> {
        self.targets.lock().push(target);
        Ok(self.ids.clone())
    }

    async fn synthesize(&self, cited_sentences: &[String]) -> Result<String, ProviderError> {
        self.synthesized.lock().push(cited_sentences.to_vec());
        self.narrative.clone().ok_or_else(|| ProviderError::ConnectionError("offline".to_string()))
    }
}

fn pipeline(model: Arc<RecordingModel>) -> SummarizationPipeline {
    SummarizationPipeline::new(model, LengthPolicy::default(), DocumentLimits::default())
}

/// Test that markup is stripped before indexing
#[test]
fn test_normalize_sampleReadme_shouldDropMarkupButKeepText() {
    let text = normalize_markup(common::SAMPLE_README);

    assert!(text.starts_with("Demo Demo is a tiny tool"));
    assert!(text.contains("See the manual for flags."));
    assert!(text.contains("demo --version"));
    assert!(!text.contains('#'));
    assert!(!text.contains("https://example.com"));
    assert!(!text.contains('\n'));
}

/// Test that the synthesizer receives cited key sentences in selector order
#[tokio::test]
async fn test_summarize_shouldPassCitedSentencesInSelectorOrder() {
    let model = Arc::new(RecordingModel {
        ids: vec!["S3".into(), "S1".into(), "S3".into()],
        narrative: Some("Recap. [S1, S3]".into()),
        ..Default::default()
    });

    let summary = pipeline(model.clone()).summarize("One here. Two here. Three here.").await.unwrap();

    assert_eq!(*model.targets.lock(), vec![7]);
    assert_eq!(
        model.synthesized.lock()[0],
        vec!["[S3] Three here.".to_string(), "[S1] One here.".to_string()]
    );
    assert_eq!(summary.key_ids.len(), 2);
}

/// Test that a synthesizer fault still yields a Part-1-only report
#[tokio::test]
async fn test_summarize_withSynthesizerFault_shouldRenderPartOneOnly() {
    let model = Arc::new(RecordingModel {
        ids: vec!["S2".into()],
        narrative: None,
        ..Default::default()
    });

    let summary = pipeline(model).summarize("One here. Two here.").await.unwrap();
    let report = render_report("Detailed Summary for notes", "notes.md", &summary);

    assert!(report.contains("* **`S2`**: Two here."));
    assert!(!report.contains("Part 2"));
}

/// Test that an empty selection is fatal
#[tokio::test]
async fn test_summarize_withNoIds_shouldFailWithoutSynthesizing() {
    let model = Arc::new(RecordingModel::default());

    let result = pipeline(model.clone()).summarize("One here. Two here.").await;

    assert!(matches!(result, Err(SummaryError::NoKeySentences)));
    assert!(model.synthesized.lock().is_empty());
}

/// Test that the requested count follows the length policy
#[tokio::test]
async fn test_summarize_withLongDocument_shouldRequestPolicyTarget() {
    let model = Arc::new(RecordingModel {
        ids: vec!["S1".into()],
        narrative: Some("Recap. [S1]".into()),
        ..Default::default()
    });
    let text: String = (1..=100).map(|i| format!("Line {} ends here. ", i)).collect();

    let summary = pipeline(model.clone()).summarize(&text).await.unwrap();

    assert_eq!(summary.sentences.len(), 100);
    assert_eq!(*model.targets.lock(), vec![15]);
}
