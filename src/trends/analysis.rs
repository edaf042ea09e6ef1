use log::{debug, error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{Config, TrendConfig};
use crate::providers::{complete_with_timeout, CompletionRequest, Provider};
use crate::sources::ScrapedPost;

use super::prompts;
use super::Trend;

static TREND_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)Trend Title: (.*?)\nSummary: (.*?)\n---").expect("trend pattern is valid")
});

/// Separator between posts in the consolidated text
pub const POST_SEPARATOR: &str = "\n---\n";

/// Two-pass trend analysis over a sample of posts
#[derive(Debug, Clone)]
pub struct TrendAnalyzer {
    pub(super) provider: Arc<dyn Provider>,
    pub(super) config: TrendConfig,
    pub(super) timeout: Duration,
}

impl TrendAnalyzer {
    pub fn new(provider: Arc<dyn Provider>, config: TrendConfig, timeout: Duration) -> Self {
        Self { provider, config, timeout }
    }

    pub fn from_config(provider: Arc<dyn Provider>, config: &Config) -> Self {
        Self::new(provider, config.trends.clone(), Duration::from_secs(config.get_timeout_secs()))
    }

    /// Pass 1: name up to `num_trends` trends; faults and unparsable answers yield none
    pub async fn identify_trends(&self, posts: &[ScrapedPost], subreddit: &str, num_trends: usize) -> Vec<Trend> {
        let consolidated = posts.iter().map(|p| p.text.as_str()).collect::<Vec<_>>().join(POST_SEPARATOR);
        info!("Identifying trends across {} posts...", posts.len());

        let request = CompletionRequest::new(
            &self.config.analysis_model,
            prompts::analysis_system(subreddit),
            prompts::analysis_prompt(subreddit, num_trends, &consolidated),
        )
        .temperature(self.config.analysis_temperature);

        match complete_with_timeout(self.provider.as_ref(), request, self.timeout).await {
            Ok(response) => {
                debug!("Trend analysis response: {}", response.text);
                let trends = parse_trends(&response.text);
                if trends.is_empty() {
                    warn!("Could not parse trends from the model response; the format may have been incorrect");
                }
                trends
            }
            Err(e) => {
                error!("Trend identification failed: {}", e);
                Vec::new()
            }
        }
    }
}

/// Parse `Trend Title: ..\nSummary: ..\n---` blocks.
///
/// Fields are trimmed; a repeated title keeps its first position and summary.
pub fn parse_trends(response: &str) -> Vec<Trend> {
    let mut trends: Vec<Trend> = Vec::new();
    for captures in TREND_BLOCK.captures_iter(response) {
        let trend = Trend::new(captures[1].trim(), captures[2].trim());
        if trend.title.is_empty() || trends.iter().any(|t| t.title == trend.title) {
            continue;
        }
        trends.push(trend);
    }
    trends
}
