/*!
 * Abstractive synthesis: rewrite key sentences into cited prose.
 */

use log::{error, info, warn};

use super::model::SummaryModel;

/// Ask `model` for a cited narrative; any fault or blank answer yields `None`.
///
/// Callers skip this step entirely when `cited_sentences` is empty.
pub async fn synthesize_narrative(model: &dyn SummaryModel, cited_sentences: &[String]) -> Option<String> {
    info!("Generating final summary from {} key sentences", cited_sentences.len());
    match model.synthesize(cited_sentences).await {
        Ok(text) if text.trim().is_empty() => {
            warn!("Synthesizer returned an empty summary");
            None
        }
        Ok(text) => Some(text.trim().to_string()),
        Err(e) => {
            error!("Final summary generation failed: {}", e);
            None
        }
    }
}
