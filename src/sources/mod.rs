/*!
 * Source providers.
 *
 * A source provider turns a locator (URL or path) into raw document text. It
 * either returns a document or a typed `FetchError`; the summarization
 * pipeline never sees a half-fetched document.
 * - `github`: README of a public repository
 * - `reddit`: a Reddit post with its top comments, and subreddit top posts
 * - `local`: a file on disk
 */

use async_trait::async_trait;
use std::fmt;

use crate::errors::FetchError;

pub mod github;
pub mod local;
pub mod reddit;

pub use github::GitHubReadmeSource;
pub use local::LocalFileSource;
pub use reddit::{RedditClient, RedditPostSource, ScrapedPost};

/// Where a document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    GitHub,
    RedditPost,
    LocalFile,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GitHub => write!(f, "GitHub repository"),
            Self::RedditPost => write!(f, "Reddit post"),
            Self::LocalFile => write!(f, "local file"),
        }
    }
}

/// Raw text of one fetched document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// File-safe identifier, used for the report file name
    pub name: String,
    /// URL or path the document was fetched from
    pub locator: String,
    /// Human title when the source has one
    pub title: Option<String>,
    /// Unprocessed text
    pub text: String,
    pub kind: SourceKind,
}

impl SourceDocument {
    /// Top-level heading of the summary report
    pub fn report_heading(&self) -> String {
        match self.kind {
            SourceKind::GitHub => format!("Detailed Summary for GitHub Repo: {}", self.name),
            SourceKind::RedditPost => format!(
                "Detailed Summary for Reddit Post: {}",
                self.title.as_deref().unwrap_or(&self.name)
            ),
            SourceKind::LocalFile => format!("Detailed Summary for {}", self.name),
        }
    }

    /// Report file name, `<name>_summary.md`
    pub fn report_file_name(&self) -> String {
        format!("{}_summary.md", self.name)
    }
}

/// Fetches raw documents
#[async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch(&self, locator: &str) -> Result<SourceDocument, FetchError>;
}
