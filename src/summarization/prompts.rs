/*!
 * Prompt templates for the two summarization calls.
 */

/// JSON key the selector must answer with
pub const KEY_SENTENCE_IDS: &str = "key_sentence_ids";

pub const SELECTOR_SYSTEM: &str = "You are a helpful research assistant that outputs only JSON.";

pub const SYNTHESIZER_SYSTEM: &str = "You are a skilled writer who follows citation rules perfectly.";

/// Instruction for picking `target` key sentence ids out of an annotated block
pub fn selector_prompt(annotated_block: &str, target: usize) -> String {
    format!(
        "Analyze the following numbered text from a document. Identify the {target} most important \
sentences for understanding its purpose, main points, and usage.\n\
Your ONLY output must be a single JSON object with a key \"{key}\" containing an array of the sentence IDs.\n\
\n\
Example: {{\"{key}\": [\"S5\", \"S12\", \"S25\"]}}\n\
\n\
Numbered Text:\n\
---\n\
{annotated_block}\n\
---",
        target = target,
        key = KEY_SENTENCE_IDS,
        annotated_block = annotated_block,
    )
}

/// Instruction for rewriting cited key sentences into a paragraph
pub fn synthesizer_prompt(cited_sentences: &[String]) -> String {
    format!(
        "Synthesize the following key sentences from a document into a smooth summary paragraph.\n\
CRITICAL: At the end of EACH new sentence you write, you MUST cite the original sentence number(s) \
it is based on, like `[S1]` or `[S5, S12]`.\n\
Base your summary ONLY on the information provided; do not add outside knowledge.\n\
Write connected prose, not a list.\n\
\n\
Key Sentences to Rewrite:\n\
---\n\
{}\n\
---\n\
Final Summary:",
        cited_sentences.join("\n")
    )
}
