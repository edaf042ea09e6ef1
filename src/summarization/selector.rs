/*!
 * Extractive selection: ask the model which sentences matter.
 *
 * Faults stop here. A failed, timed-out or unparsable selection becomes an
 * empty id list and the pipeline decides what that means.
 */

use log::{error, info, warn};
use serde_json::Value;

use crate::errors::ProviderError;

use super::model::SummaryModel;
use super::prompts::KEY_SENTENCE_IDS;

/// Parse `{"key_sentence_ids": [...]}` out of a model response.
///
/// A surrounding ```` ```json ```` fence is tolerated and non-string elements are
/// skipped. Anything else that does not match the contract is a `ParseError`.
pub fn parse_key_sentence_ids(response: &str) -> Result<Vec<String>, ProviderError> {
    let body = strip_code_fence(response.trim());
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ProviderError::ParseError(format!("selector response is not JSON: {}", e)))?;

    let ids = value
        .get(KEY_SENTENCE_IDS)
        .ok_or_else(|| ProviderError::ParseError(format!("selector response has no \"{}\" key", KEY_SENTENCE_IDS)))?
        .as_array()
        .ok_or_else(|| ProviderError::ParseError(format!("\"{}\" is not an array", KEY_SENTENCE_IDS)))?;

    Ok(ids
        .iter()
        .filter_map(Value::as_str)
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect())
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Ask `model` for about `target` key sentence ids; any fault yields an empty list
pub async fn select_key_sentences(model: &dyn SummaryModel, annotated_block: &str, target: usize) -> Vec<String> {
    info!("Requesting {} key sentences", target);
    match model.select(annotated_block, target).await {
        Ok(ids) => {
            if ids.is_empty() {
                warn!("Selector returned no sentence ids");
            }
            ids
        }
        Err(ProviderError::ParseError(reason)) => {
            warn!("Could not parse key sentence ids: {}", reason);
            Vec::new()
        }
        Err(e) => {
            error!("Key sentence extraction failed: {}", e);
            Vec::new()
        }
    }
}
