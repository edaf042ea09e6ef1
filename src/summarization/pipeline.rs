/*!
 * The traceable summarization pipeline.
 *
 * One pipeline serves every source: normalize, index, pick a target length,
 * select key sentences, synthesize a cited narrative, check its citations.
 * Processing is strictly sequential for a single document.
 */

use log::{info, warn};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::app_config::SummarizationConfig;
use crate::errors::SummaryError;

use super::citations::{check_citations, CitationReport};
use super::indexer::{cite, index_sentences, SentenceId, SentenceMap};
use super::length_policy::LengthPolicy;
use super::model::SummaryModel;
use super::normalizer::normalize_markup;
use super::segmenter::SentenceSegmenter;
use super::selector::select_key_sentences;
use super::synthesizer::synthesize_narrative;

/// Input limits enforced before any model call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLimits {
    pub max_sentences: usize,
    pub max_input_chars: usize,
}

impl Default for DocumentLimits {
    fn default() -> Self {
        Self {
            max_sentences: 2000,
            max_input_chars: 200_000,
        }
    }
}

impl DocumentLimits {
    pub fn from_config(config: &SummarizationConfig) -> Self {
        Self {
            max_sentences: config.max_sentences,
            max_input_chars: config.max_input_chars,
        }
    }
}

/// Outcome of summarizing one document
#[derive(Debug, Clone)]
pub struct TraceableSummary {
    /// Every sentence of the normalized document, by id
    pub sentences: SentenceMap,
    /// Number of key sentences requested
    pub target: usize,
    /// Identifiers exactly as the selector returned them
    pub raw_key_ids: Vec<String>,
    /// Valid, distinct identifiers in selector order
    pub key_ids: Vec<SentenceId>,
    /// Cited narrative; `None` when synthesis failed or was skipped
    pub narrative: Option<String>,
    /// Citation check of the narrative
    pub citations: Option<CitationReport>,
}

impl TraceableSummary {
    /// Key sentences in selector order, with their text
    pub fn key_sentences(&self) -> impl Iterator<Item = (SentenceId, &str)> + '_ {
        self.key_ids
            .iter()
            .filter_map(|id| self.sentences.get(id).map(|text| (*id, text)))
    }
}

pub struct SummarizationPipeline {
    model: Arc<dyn SummaryModel>,
    policy: LengthPolicy,
    limits: DocumentLimits,
    abbreviations_file: Option<PathBuf>,
}

impl SummarizationPipeline {
    pub fn new(model: Arc<dyn SummaryModel>, policy: LengthPolicy, limits: DocumentLimits) -> Self {
        Self {
            model,
            policy,
            limits,
            abbreviations_file: None,
        }
    }

    pub fn from_config(model: Arc<dyn SummaryModel>, config: &SummarizationConfig) -> Self {
        Self::new(model, LengthPolicy::from_config(config), DocumentLimits::from_config(config))
            .with_abbreviations_file(config.abbreviations_file.clone())
    }

    /// Extra abbreviations for the process-wide segmenter
    pub fn with_abbreviations_file(mut self, path: Option<PathBuf>) -> Self {
        self.abbreviations_file = path;
        self
    }

    /// Summarize one raw document
    pub async fn summarize(&self, raw: &str) -> Result<TraceableSummary, SummaryError> {
        info!("Normalizing {} characters of markup", raw.len());
        let text = normalize_markup(raw);

        let segmenter = SentenceSegmenter::shared(self.abbreviations_file.as_deref())?;
        let document = index_sentences(segmenter, &text);
        let total = document.sentences.len();
        info!("Indexed {} sentences", total);

        if total == 0 {
            return Err(SummaryError::NothingToSummarize);
        }
        self.check_limits(total, text.chars().count())?;

        let target = self.policy.target(total);
        let raw_key_ids = select_key_sentences(self.model.as_ref(), &document.annotated, target).await;
        if raw_key_ids.is_empty() {
            return Err(SummaryError::NoKeySentences);
        }

        let key_ids = filter_key_ids(&document.sentences, &raw_key_ids);
        info!("Selector returned {} ids, {} usable", raw_key_ids.len(), key_ids.len());

        let mut summary = TraceableSummary {
            sentences: document.sentences,
            target,
            raw_key_ids,
            key_ids,
            narrative: None,
            citations: None,
        };

        if summary.key_ids.is_empty() {
            warn!("None of the selected ids match a sentence; skipping the final summary");
            return Ok(summary);
        }

        let cited: Vec<String> = summary.key_sentences().map(|(id, text)| cite(id, text)).collect();
        summary.narrative = synthesize_narrative(self.model.as_ref(), &cited).await;

        if let Some(narrative) = &summary.narrative {
            let report = check_citations(narrative, &summary.key_ids);
            if report.tag_count == 0 {
                warn!("Final summary carries no citation tags");
            }
            if !report.unknown.is_empty() {
                let unknown: Vec<String> = report.unknown.iter().map(ToString::to_string).collect();
                warn!("Final summary cites sentences it was not given: {}", unknown.join(", "));
            }
            summary.citations = Some(report);
        }

        Ok(summary)
    }

    fn check_limits(&self, sentences: usize, chars: usize) -> Result<(), SummaryError> {
        if sentences > self.limits.max_sentences {
            return Err(SummaryError::DocumentTooLarge {
                actual: sentences,
                limit: self.limits.max_sentences,
                unit: "sentences",
            });
        }
        if chars > self.limits.max_input_chars {
            return Err(SummaryError::DocumentTooLarge {
                actual: chars,
                limit: self.limits.max_input_chars,
                unit: "characters",
            });
        }
        Ok(())
    }
}

/// Keep ids that name a sentence, in the order given, dropping repeats
pub fn filter_key_ids(sentences: &SentenceMap, raw_ids: &[String]) -> Vec<SentenceId> {
    let mut seen = HashSet::new();
    raw_ids
        .iter()
        .filter_map(|raw| sentences.resolve(raw).map(|(id, _)| id))
        .filter(|id| seen.insert(*id))
        .collect()
}
