use anyhow::{anyhow, Context, Result};
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{validate_time_filter, Config};
use crate::file_utils::FileManager;
use crate::providers::{build_provider, Provider};
use crate::sources::{
    GitHubReadmeSource, LocalFileSource, RedditClient, RedditPostSource, ScrapedPost, SourceDocument, SourceProvider,
};
use crate::summarization::{render_report, LlmSummaryModel, SummarizationPipeline, TraceableSummary};
use crate::trends::{render_trend_report, trend_report_file_name, TrendAnalyzer};

// @module: Application controller for summaries and trend reports

/// Options of one trend report run; `None` falls back to the configuration
#[derive(Debug, Clone, Default)]
pub struct TrendOptions {
    pub limit: Option<usize>,
    pub time_filter: Option<String>,
    pub num_trends: Option<usize>,
}

/// Counts of a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderOutcome {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Model client shared by every workflow
    provider: Arc<dyn Provider>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let provider = build_provider(&config);
        Ok(Self::with_provider(config, provider))
    }

    /// Create a controller around an existing provider
    pub fn with_provider(config: Config, provider: Arc<dyn Provider>) -> Self {
        Self { config, provider }
    }

    /// Check that the selector model answers
    pub async fn test_connection(&self) -> Result<()> {
        self.provider
            .test_connection(&self.config.summarization.selector_model)
            .await
            .with_context(|| format!("Cannot reach {}", self.config.provider.display_name()))
    }

    fn pipeline(&self) -> SummarizationPipeline {
        let model = LlmSummaryModel::from_config(self.provider.clone(), &self.config);
        SummarizationPipeline::from_config(Arc::new(model), &self.config.summarization)
    }

    /// Summarize an already fetched document and write its report into `output_dir`
    pub async fn summarize_document(&self, document: &SourceDocument, output_dir: &Path) -> Result<PathBuf> {
        info!("Summarizing {} '{}'", document.kind, document.name);

        let summary = self.pipeline()
            .summarize(&document.text)
            .await
            .with_context(|| format!("Summarization of {} failed", document.locator))?;
        Self::log_summary(&summary);

        let report = render_report(&document.report_heading(), &document.locator, &summary);
        let path = FileManager::write_report(output_dir, &document.report_file_name(), &report)
            .context("Writing the summary report failed")?;

        info!("Report saved to {}", path.display());
        Ok(path)
    }

    /// Fetch `locator` from `source`, then summarize it
    pub async fn summarize_source(&self, source: &dyn SourceProvider, locator: &str, output_dir: &Path) -> Result<PathBuf> {
        let document = source
            .fetch(locator)
            .await
            .with_context(|| format!("Fetching {} failed", locator))?;
        self.summarize_document(&document, output_dir).await
    }

    /// README of a GitHub repository
    pub async fn summarize_github(&self, url: &str) -> Result<PathBuf> {
        self.summarize_source(&GitHubReadmeSource::default(), url, &self.config.output.repo_dir).await
    }

    /// A Reddit post with its top comments
    pub async fn summarize_reddit_post(&self, url: &str) -> Result<PathBuf> {
        let source = RedditPostSource::from_config(&self.config.reddit)
            .context("Reddit is not configured")?;
        self.summarize_source(&source, url, &self.config.output.reddit_dir).await
    }

    /// A local document, or every document below a directory
    pub async fn summarize_path(&self, path: &Path, force_overwrite: bool) -> Result<FolderOutcome> {
        if path.is_dir() {
            return self.summarize_folder(path, force_overwrite).await;
        }

        let locator = path.to_string_lossy();
        self.summarize_source(&LocalFileSource, &locator, &self.config.output.file_dir).await?;
        Ok(FolderOutcome { processed: 1, ..Default::default() })
    }

    /// Summarize every document below `input_dir`; a failing file does not stop the run
    pub async fn summarize_folder(&self, input_dir: &Path, force_overwrite: bool) -> Result<FolderOutcome> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let documents = FileManager::find_documents(input_dir)?;
        if documents.is_empty() {
            return Err(anyhow!("No .md or .txt files found in directory: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(documents.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Processing files");

        let output_dir = &self.config.output.file_dir;
        let mut outcome = FolderOutcome::default();

        for path in &documents {
            let locator = path.to_string_lossy().to_string();
            folder_pb.set_message(format!("Processing: {}", locator));

            let document = match LocalFileSource.fetch(&locator).await {
                Ok(document) => document,
                Err(e) => {
                    error!("Error reading {}: {}", locator, e);
                    outcome.failed += 1;
                    folder_pb.inc(1);
                    continue;
                }
            };

            if !force_overwrite && FileManager::file_exists(output_dir.join(document.report_file_name())) {
                warn!("Skipping {}, report already exists (use -f to force overwrite)", locator);
                outcome.skipped += 1;
                folder_pb.inc(1);
                continue;
            }

            match self.summarize_document(&document, output_dir).await {
                Ok(_) => outcome.processed += 1,
                Err(e) => {
                    error!("Error processing {}: {:#}", locator, e);
                    outcome.failed += 1;
                }
            }
            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");
        info!(
            "Folder processing completed in {}: {} processed, {} skipped, {} errors",
            Self::format_duration(start_time.elapsed()),
            outcome.processed,
            outcome.skipped,
            outcome.failed
        );
        Ok(outcome)
    }

    /// Scrape a subreddit and write its trend report
    pub async fn trend_report(&self, subreddit: &str, options: &TrendOptions) -> Result<Option<PathBuf>> {
        let trends = &self.config.trends;
        let time_filter = options.time_filter.as_deref().unwrap_or(&trends.time_filter);
        validate_time_filter(time_filter)?;
        let limit = options.limit.unwrap_or(trends.post_limit);
        let num_trends = options.num_trends.unwrap_or(trends.num_trends);
        if limit == 0 || num_trends == 0 {
            return Err(anyhow!("Post limit and trend count must be positive"));
        }

        let client = RedditClient::new(&self.config.reddit).context("Reddit is not configured")?;

        let posts = client
            .top_posts(subreddit, time_filter, limit, trends.comments_per_post)
            .await
            .with_context(|| format!("Scraping r/{} failed", subreddit))?;

        self.trend_report_from_posts(subreddit, &posts, num_trends).await
    }

    /// Run both trend passes over `posts`; `None` when nothing could be reported
    pub async fn trend_report_from_posts(
        &self,
        subreddit: &str,
        posts: &[ScrapedPost],
        num_trends: usize,
    ) -> Result<Option<PathBuf>> {
        if posts.is_empty() {
            warn!("No data was scraped from r/{}; cannot generate a report", subreddit);
            return Ok(None);
        }

        let analyzer = TrendAnalyzer::from_config(self.provider.clone(), &self.config);
        let trends = analyzer.identify_trends(posts, subreddit, num_trends).await;
        if trends.is_empty() {
            warn!("Could not identify any trends from the data");
            return Ok(None);
        }
        for trend in &trends {
            info!("Trend: {} - {}", trend.title, trend.summary);
        }

        info!("Categorizing {} posts against {} trends...", posts.len(), trends.len());
        let assignments = analyzer.classify_posts(posts, &trends).await;

        let generated_at = Local::now().naive_local();
        let report = render_trend_report(subreddit, &trends, &assignments, generated_at);
        let path = FileManager::write_report(
            &self.config.output.trends_dir,
            &trend_report_file_name(subreddit, generated_at),
            &report,
        )
        .context("Writing the trend report failed")?;

        info!("Analysis complete! Report saved to {}", path.display());
        Ok(Some(path))
    }

    fn log_summary(summary: &TraceableSummary) {
        info!(
            "{} sentences, {} requested, {} key sentences kept",
            summary.sentences.len(),
            summary.target,
            summary.key_ids.len()
        );
        match &summary.citations {
            Some(report) if report.is_well_formed() => info!("All {} citation tags verified", report.tag_count),
            Some(_) => warn!("Final summary delivered with citation problems"),
            None => warn!("Report contains key sentences only"),
        }
    }

    // @returns: Human readable duration
    fn format_duration(duration: Duration) -> String {
        let seconds = duration.as_secs();
        let minutes = seconds / 60;
        if minutes > 0 {
            format!("{}m {}s", minutes, seconds % 60)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
