use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::providers::{complete_with_timeout, CompletionRequest};
use crate::sources::ScrapedPost;

use super::analysis::TrendAnalyzer;
use super::prompts;
use super::Trend;

/// The classifier answers with a trend number or `None`
const CLASSIFICATION_MAX_TOKENS: u32 = 16;

static FIRST_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("number pattern is valid"));

/// Posts assigned to each trend, indexed like the trend list
pub type TrendAssignments = Vec<Vec<ScrapedPost>>;

/// 0-based trend index named by a classifier answer.
///
/// The first integer in the answer is read as a 1-based trend number; an answer
/// without one (e.g. `None`) or out of range leaves the post unassigned.
pub fn parse_trend_number(response: &str, trend_count: usize) -> Option<usize> {
    let number: usize = FIRST_NUMBER.find(response)?.as_str().parse().ok()?;
    (1..=trend_count).contains(&number).then(|| number - 1)
}

impl TrendAnalyzer {
    /// Pass 2 for one post; faults leave the post unassigned
    pub async fn classify_post(&self, post: &ScrapedPost, trends: &[Trend]) -> Option<usize> {
        let request = CompletionRequest::new(
            &self.config.classification_model,
            prompts::CLASSIFICATION_SYSTEM,
            prompts::classification_prompt(&post.text, trends),
        )
        .temperature(0.0)
        .max_tokens(CLASSIFICATION_MAX_TOKENS);

        match complete_with_timeout(self.provider.as_ref(), request, self.timeout).await {
            Ok(response) => {
                debug!("Classified '{}' as {:?}", post.title, response.text.trim());
                parse_trend_number(response.text.trim(), trends.len())
            }
            Err(e) => {
                warn!("Could not classify post '{}': {}", post.title, e);
                None
            }
        }
    }

    /// Classify every post concurrently and group them per trend, keeping post order
    pub async fn classify_posts(&self, posts: &[ScrapedPost], trends: &[Trend]) -> TrendAssignments {
        let max_concurrent = self.config.concurrent_requests.max(1);
        let semaphore = Arc::new(Semaphore::new(max_concurrent));

        let progress_bar = ProgressBar::new(posts.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} posts ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message("Classifying posts");

        let mut results = stream::iter(posts.iter().enumerate())
            .map(|(index, post)| {
                let semaphore = semaphore.clone();
                let progress_bar = progress_bar.clone();
                async move {
                    let assignment = match semaphore.acquire().await {
                        Ok(_permit) => self.classify_post(post, trends).await,
                        Err(_) => None,
                    };
                    progress_bar.inc(1);
                    (index, assignment)
                }
            })
            .buffer_unordered(max_concurrent)
            .collect::<Vec<_>>()
            .await;

        progress_bar.finish_and_clear();
        results.sort_by_key(|(index, _)| *index);

        let mut assignments: TrendAssignments = vec![Vec::new(); trends.len()];
        for (index, assignment) in results {
            if let Some(trend) = assignment {
                assignments[trend].push(posts[index].clone());
            }
        }
        assignments
    }
}
