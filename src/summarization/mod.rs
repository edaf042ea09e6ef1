/*!
 * Traceable summarization.
 *
 * A document is normalized to plain text, split into numbered sentences,
 * reduced to key sentences by a model, and rewritten into a narrative whose
 * every sentence cites the key sentences it came from:
 * - `normalizer`: Markdown/HTML to plain text
 * - `segmenter` and `indexer`: sentence boundaries and `S<n>` identifiers
 * - `length_policy`: how many key sentences to ask for
 * - `model`: the two-operation model boundary
 * - `selector` and `synthesizer`: the two model passes
 * - `citations`: post-hoc citation check
 * - `pipeline`: the sequence above
 * - `report`: Markdown output
 */

pub mod citations;
pub mod indexer;
pub mod length_policy;
pub mod model;
pub mod normalizer;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod segmenter;
pub mod selector;
pub mod synthesizer;

pub use citations::{check_citations, CitationReport};
pub use indexer::{SentenceId, SentenceMap};
pub use length_policy::LengthPolicy;
pub use model::{LlmSummaryModel, SummaryModel, SummaryModelSettings};
pub use pipeline::{DocumentLimits, SummarizationPipeline, TraceableSummary};
pub use report::render_report;
