/*!
 * Post-hoc check of citation tags in a synthesized narrative.
 *
 * The synthesizer is only *asked* to cite; nothing forces it to. This check
 * reports what it actually did so the caller can log a soft fault.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use super::indexer::SentenceId;

static CITATION_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\s*S\d+(?:\s*,\s*S\d+)*\s*\]").expect("citation pattern is valid")
});

static CITED_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"S\d+").expect("id pattern is valid"));

/// What the narrative cited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitationReport {
    /// Number of citation tags found
    pub tag_count: usize,
    /// Distinct ids cited, in id order
    pub cited: Vec<SentenceId>,
    /// Cited ids that were not among the submitted key sentences
    pub unknown: Vec<SentenceId>,
}

impl CitationReport {
    /// True when at least one tag is present and every cited id was submitted
    pub fn is_well_formed(&self) -> bool {
        self.tag_count > 0 && self.unknown.is_empty()
    }
}

/// Scan `narrative` for `[S<n>]` / `[S<n>, S<m>]` tags and compare against `submitted`
pub fn check_citations(narrative: &str, submitted: &[SentenceId]) -> CitationReport {
    let mut tag_count = 0;
    let mut cited = BTreeSet::new();

    for tag in CITATION_TAG.find_iter(narrative) {
        tag_count += 1;
        for id in CITED_ID.find_iter(tag.as_str()) {
            if let Ok(id) = id.as_str().parse::<SentenceId>() {
                cited.insert(id);
            }
        }
    }

    let unknown = cited.iter().filter(|id| !submitted.contains(id)).copied().collect();
    CitationReport {
        tag_count,
        cited: cited.into_iter().collect(),
        unknown,
    }
}
