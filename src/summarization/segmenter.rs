/*!
 * Sentence boundary detection.
 *
 * Boundaries come from Unicode sentence segmentation (UAX #29), which already
 * keeps decimals (`3.14`), lowercase continuations (`e.g. this`) and closing
 * quotes after terminal punctuation in place. A repair pass then removes the
 * boundaries UAX #29 places after abbreviations and initialisms such as
 * `Dr.` or `U.S.`.
 *
 * A lone capital (`B.`) ends a sentence unless it belongs to a chain of
 * initials (`J. R. R.`) or follows a title (`Dr. J. Smith`). `I.` always ends one.
 *
 * The abbreviation table is built once per process by [`SentenceSegmenter::shared`].
 */

use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

use crate::errors::SummaryError;

/// Lowercased, without the trailing period.
///
/// Only words that almost never end a sentence: UAX #29 already joins an
/// abbreviation with a lowercase continuation, so these only matter before a
/// capitalized word.
const BUILTIN_ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt",
    "vs", "cf", "al", "approx", "fig", "figs", "vol", "vols", "pp",
    "dept", "univ",
    "jan", "feb", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
    "gen", "gov", "sgt", "capt", "lt", "rev", "hon",
];

/// Dotted initialisms of two or more letters: `U.S.`, `e.g.`
static DOTTED_INITIALISM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[\s(\[])(?:\p{L}\.){2,}$").expect("initialism pattern is valid")
});

/// A single capital followed by a period at the end of the candidate
static SINGLE_INITIAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[\s(\[])(\p{Lu})\.$").expect("initial pattern is valid")
});

/// A chunk that opens with another initial
static LEADING_INITIAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\p{Lu}\.(?:\s|$)").expect("leading initial pattern is valid")
});

static SEGMENTER: OnceCell<SentenceSegmenter> = OnceCell::new();

/// Splits plain text into sentences
#[derive(Debug, Clone)]
pub struct SentenceSegmenter {
    abbreviations: HashSet<String>,
}

impl Default for SentenceSegmenter {
    fn default() -> Self {
        Self::with_abbreviations(std::iter::empty::<String>())
    }
}

impl SentenceSegmenter {
    /// Built-in abbreviations plus `extra` (case-insensitive, trailing period optional)
    pub fn with_abbreviations<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut abbreviations: HashSet<String> = BUILTIN_ABBREVIATIONS.iter()
            .map(|a| a.to_string())
            .collect();
        for item in extra {
            let item = item.as_ref().trim().trim_end_matches('.').to_lowercase();
            if !item.is_empty() && !item.starts_with('#') {
                abbreviations.insert(item);
            }
        }
        Self { abbreviations }
    }

    /// Load extra abbreviations from a file, one per line (`#` starts a comment line)
    pub fn from_file(path: &Path) -> Result<Self, SummaryError> {
        let content = fs::read_to_string(path).map_err(|e| {
            SummaryError::SegmenterInit(format!("cannot read abbreviations file {}: {}", path.display(), e))
        })?;
        Ok(Self::with_abbreviations(content.lines()))
    }

    /// Process-wide segmenter, initialized on first use.
    ///
    /// Later calls return the first instance whatever `abbreviations_file` they pass.
    /// A failure is not cached, so a corrected file can be retried.
    pub fn shared(abbreviations_file: Option<&Path>) -> Result<&'static SentenceSegmenter, SummaryError> {
        SEGMENTER.get_or_try_init(|| match abbreviations_file {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        })
    }

    /// Split `text` into trimmed, non-empty sentences in document order
    pub fn split(&self, text: &str) -> Vec<String> {
        let mut sentences: Vec<String> = Vec::new();
        let mut pending = String::new();

        let chunks: Vec<&str> = text.split_sentence_bounds().collect();
        for (index, chunk) in chunks.iter().enumerate() {
            pending.push_str(chunk);
            if self.ends_with_abbreviation(pending.trim_end(), chunks.get(index + 1).copied()) {
                continue;
            }
            let sentence = pending.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            pending.clear();
        }

        let rest = pending.trim();
        if !rest.is_empty() {
            sentences.push(rest.to_string());
        }
        sentences
    }

    fn ends_with_abbreviation(&self, candidate: &str, next_chunk: Option<&str>) -> bool {
        let Some(without_period) = candidate.strip_suffix('.') else {
            return false;
        };
        if DOTTED_INITIALISM.is_match(candidate) {
            return true;
        }
        if let Some(caps) = SINGLE_INITIAL.captures(candidate) {
            if &caps[1] == "I" {
                return false;
            }
            return self.follows_title_or_initial(without_period)
                || next_chunk.is_some_and(|next| LEADING_INITIAL.is_match(next));
        }
        let last_word = without_period.rsplit(is_word_separator).next().unwrap_or_default();
        !last_word.is_empty() && self.abbreviations.contains(&last_word.to_lowercase())
    }

    /// Whether the word before the trailing initial is a title or another initial
    fn follows_title_or_initial(&self, without_period: &str) -> bool {
        let mut words = without_period.rsplit(is_word_separator).filter(|w| !w.is_empty());
        words.next();
        let Some(previous) = words.next() else {
            return false;
        };
        let Some(stem) = previous.strip_suffix('.') else {
            return false;
        };
        let is_initial = stem.chars().count() == 1 && stem.chars().all(char::is_uppercase);
        is_initial || self.abbreviations.contains(&stem.to_lowercase())
    }
}

fn is_word_separator(c: char) -> bool {
    c.is_whitespace() || c == '(' || c == '['
}
