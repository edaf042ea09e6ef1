use async_trait::async_trait;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::errors::FetchError;
use super::{SourceDocument, SourceKind, SourceProvider};

static REPO_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"github\.com/([^/]+/[^/.]+)").expect("repository pattern is valid")
});

/// Branches tried, in order, when looking for the README
pub const README_BRANCHES: [&str; 2] = ["main", "master"];

/// Fetches `README.md` of a public GitHub repository
#[derive(Debug, Clone)]
pub struct GitHubReadmeSource {
    client: Client,
    raw_base: String,
}

impl Default for GitHubReadmeSource {
    fn default() -> Self {
        Self::new("https://raw.githubusercontent.com")
    }
}

impl GitHubReadmeSource {
    /// `raw_base` is the raw-content host, overridable for tests
    pub fn new(raw_base: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            raw_base: raw_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn readme_url(&self, repo: &str, branch: &str) -> String {
        format!("{}/{}/{}/README.md", self.raw_base, repo, branch)
    }
}

/// Extract `user/repo` from a repository URL; a trailing `.git` is dropped
pub fn parse_repo_path(url: &str) -> Result<String, FetchError> {
    let captures = REPO_PATH
        .captures(url)
        .ok_or_else(|| FetchError::InvalidLocator(format!("not a GitHub repository URL: {}", url)))?;
    let repo = &captures[1];
    Ok(repo.strip_suffix(".git").unwrap_or(repo).to_string())
}

/// `user/repo` -> `user_repo`
pub fn repo_file_name(repo: &str) -> String {
    repo.replace('/', "_")
}

#[async_trait]
impl SourceProvider for GitHubReadmeSource {
    async fn fetch(&self, locator: &str) -> Result<SourceDocument, FetchError> {
        let repo = parse_repo_path(locator)?;

        for branch in README_BRANCHES {
            let url = self.readme_url(&repo, branch);
            debug!("Trying {}", url);
            let response = self.client.get(&url).send().await?;

            match response.status() {
                status if status.is_success() => {
                    info!("Fetched README of {} from branch '{}'", repo, branch);
                    let text = response.text().await?;
                    return Ok(SourceDocument {
                        name: repo_file_name(&repo),
                        locator: locator.to_string(),
                        title: Some(repo.clone()),
                        text,
                        kind: SourceKind::GitHub,
                    });
                }
                StatusCode::NOT_FOUND => continue,
                status => {
                    return Err(FetchError::Network(format!("{} returned HTTP {}", url, status)));
                }
            }
        }

        Err(FetchError::NotFound(format!(
            "README.md of {} on branches {}",
            repo,
            README_BRANCHES.join(", ")
        )))
    }
}
