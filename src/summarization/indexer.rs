/*!
 * Sentence indexing.
 *
 * Every sentence of a normalized document gets an identifier `S1..Sn` in
 * document order. The identifiers are the unit of citation for the rest of the
 * pipeline, so the map is immutable once built.
 */

use std::fmt;
use std::str::FromStr;

use super::segmenter::SentenceSegmenter;

/// Identifier of a sentence within one document, displayed as `S<n>` (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SentenceId(usize);

impl SentenceId {
    /// Returns `None` for 0; identifiers are 1-based
    pub fn new(number: usize) -> Option<Self> {
        (number > 0).then_some(Self(number))
    }

    pub fn number(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SentenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Error for strings that are not of the form `S<n>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSentenceId(pub String);

impl fmt::Display for InvalidSentenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid sentence id: {:?}", self.0)
    }
}

impl std::error::Error for InvalidSentenceId {}

impl FromStr for SentenceId {
    type Err = InvalidSentenceId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .strip_prefix('S')
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<usize>().ok())
            .and_then(SentenceId::new)
            .ok_or_else(|| InvalidSentenceId(s.to_string()))
    }
}

/// Ordered sentences of one document; entry `i` has id `S<i+1>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentenceMap {
    sentences: Vec<String>,
}

impl SentenceMap {
    pub fn new(sentences: Vec<String>) -> Self {
        Self { sentences }
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn get(&self, id: &SentenceId) -> Option<&str> {
        self.sentences.get(id.number() - 1).map(String::as_str)
    }

    pub fn contains(&self, id: &SentenceId) -> bool {
        id.number() <= self.sentences.len()
    }

    /// Look up a raw identifier as returned by a model
    pub fn resolve(&self, raw: &str) -> Option<(SentenceId, &str)> {
        let id = raw.parse::<SentenceId>().ok()?;
        self.get(&id).map(|text| (id, text))
    }

    /// Entries in document order
    pub fn iter(&self) -> impl Iterator<Item = (SentenceId, &str)> + '_ {
        self.sentences
            .iter()
            .enumerate()
            .map(|(i, text)| (SentenceId(i + 1), text.as_str()))
    }

    /// `[S<i>] <text>` per line, the form the selector reads
    pub fn annotated_block(&self) -> String {
        self.iter()
            .map(|(id, text)| format!("[{}] {}", id, text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A sentence map together with its annotated rendering
#[derive(Debug, Clone, Default)]
pub struct IndexedDocument {
    pub sentences: SentenceMap,
    pub annotated: String,
}

/// Segment normalized text and number its sentences
pub fn index_sentences(segmenter: &SentenceSegmenter, text: &str) -> IndexedDocument {
    let sentences = SentenceMap::new(segmenter.split(text));
    let annotated = sentences.annotated_block();
    IndexedDocument { sentences, annotated }
}

/// `[<id>] <text>` for the synthesizer prompt
pub fn cite(id: SentenceId, text: &str) -> String {
    format!("[{}] {}", id, text)
}
