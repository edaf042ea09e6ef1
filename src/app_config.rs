use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Model provider to use
    #[serde(default)]
    pub provider: ModelProvider,

    /// Available model providers
    #[serde(default = "default_available_providers")]
    pub available_providers: Vec<ProviderConfig>,

    /// Traceable summarization settings
    #[serde(default)]
    pub summarization: SummarizationConfig,

    /// Subreddit trend report settings
    #[serde(default)]
    pub trends: TrendConfig,

    /// Reddit API credentials and limits
    #[serde(default)]
    pub reddit: RedditConfig,

    /// Report output directories
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Model provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    // @provider: OpenAI
    #[default]
    OpenAI,
    // @provider: Anthropic
    Anthropic,
    // @provider: Ollama
    Ollama,
    // @provider: LM Studio (OpenAI-compatible local server)
    LMStudio,
}

impl ModelProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Ollama => "Ollama",
            Self::LMStudio => "LM Studio",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::OpenAI => "openai".to_string(),
            Self::Anthropic => "anthropic".to_string(),
            Self::Ollama => "ollama".to_string(),
            Self::LMStudio => "lmstudio".to_string(),
        }
    }

    // @returns: Whether the hosted API needs a key
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::OpenAI | Self::Anthropic)
    }
}

impl std::fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds for a single model call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Retries for 429/5xx responses
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    // @field: Base backoff, doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: ModelProvider) -> Self {
        let endpoint = match provider_type {
            ModelProvider::OpenAI => default_openai_endpoint(),
            ModelProvider::Anthropic => default_anthropic_endpoint(),
            ModelProvider::Ollama => default_ollama_endpoint(),
            ModelProvider::LMStudio => default_lmstudio_endpoint(),
        };
        let timeout_secs = match provider_type {
            // local models are slow to load the first time
            ModelProvider::Ollama | ModelProvider::LMStudio => default_local_timeout_secs(),
            _ => default_timeout_secs(),
        };

        Self {
            provider_type: provider_type.to_lowercase_string(),
            api_key: String::new(),
            endpoint,
            timeout_secs,
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Settings for the two-pass traceable summary
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SummarizationConfig {
    /// Model used to pick key sentence ids
    #[serde(default = "default_selector_model")]
    pub selector_model: String,

    /// Model used to rewrite key sentences into a cited narrative
    #[serde(default = "default_synthesizer_model")]
    pub synthesizer_model: String,

    /// Temperature for the rewriting call
    #[serde(default = "default_synthesizer_temperature")]
    pub synthesizer_temperature: f32,

    /// Share of all sentences requested as key sentences, in percent
    #[serde(default = "default_key_sentence_percent")]
    pub key_sentence_percent: u32,

    /// Lower bound for the requested key sentence count
    #[serde(default = "default_min_key_sentences")]
    pub min_key_sentences: usize,

    /// Upper bound for the requested key sentence count
    #[serde(default = "default_max_key_sentences")]
    pub max_key_sentences: usize,

    /// Documents with more sentences are rejected
    #[serde(default = "default_max_sentences")]
    pub max_sentences: usize,

    /// Documents with more normalized characters are rejected
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,

    /// Optional file with extra abbreviations, one per line
    #[serde(default)]
    pub abbreviations_file: Option<PathBuf>,
}

impl Default for SummarizationConfig {
    fn default() -> Self {
        Self {
            selector_model: default_selector_model(),
            synthesizer_model: default_synthesizer_model(),
            synthesizer_temperature: default_synthesizer_temperature(),
            key_sentence_percent: default_key_sentence_percent(),
            min_key_sentences: default_min_key_sentences(),
            max_key_sentences: default_max_key_sentences(),
            max_sentences: default_max_sentences(),
            max_input_chars: default_max_input_chars(),
            abbreviations_file: None,
        }
    }
}

/// Settings for the subreddit trend report
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TrendConfig {
    /// Model used to identify trends over all posts
    #[serde(default = "default_trend_model")]
    pub analysis_model: String,

    /// Model used to classify single posts
    #[serde(default = "default_trend_model")]
    pub classification_model: String,

    /// Temperature for trend identification
    #[serde(default = "default_synthesizer_temperature")]
    pub analysis_temperature: f32,

    /// Number of trends to ask for
    #[serde(default = "default_num_trends")]
    pub num_trends: usize,

    /// Number of top posts to scrape
    #[serde(default = "default_post_limit")]
    pub post_limit: usize,

    /// Reddit time filter (hour, day, week, month, year, all)
    #[serde(default = "default_time_filter")]
    pub time_filter: String,

    /// Comments included per scraped post
    #[serde(default = "default_comments_per_post")]
    pub comments_per_post: usize,

    /// Maximum concurrent classification calls
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            analysis_model: default_trend_model(),
            classification_model: default_trend_model(),
            analysis_temperature: default_synthesizer_temperature(),
            num_trends: default_num_trends(),
            post_limit: default_post_limit(),
            time_filter: default_time_filter(),
            comments_per_post: default_comments_per_post(),
            concurrent_requests: default_concurrent_requests(),
        }
    }
}

/// Reddit API credentials
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RedditConfig {
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    /// Used in the user agent string
    #[serde(default)]
    pub username: String,

    /// Comments included when summarizing a single post
    #[serde(default = "default_post_comment_limit")]
    pub post_comment_limit: usize,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            username: String::new(),
            post_comment_limit: default_post_comment_limit(),
        }
    }
}

impl RedditConfig {
    /// Whether all credentials needed for an app-only token are present
    pub fn has_credentials(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty() && !self.username.is_empty()
    }

    pub fn user_agent(&self) -> String {
        format!("tracesum/{} by u/{}", env!("CARGO_PKG_VERSION"), self.username)
    }
}

/// Output directories for generated reports
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_repo_dir")]
    pub repo_dir: PathBuf,

    #[serde(default = "default_reddit_dir")]
    pub reddit_dir: PathBuf,

    #[serde(default = "default_trends_dir")]
    pub trends_dir: PathBuf,

    #[serde(default = "default_file_dir")]
    pub file_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            repo_dir: default_repo_dir(),
            reddit_dir: default_reddit_dir(),
            trends_dir: default_trends_dir(),
            file_dir: default_file_dir(),
        }
    }
}

impl OutputConfig {
    /// Point every report directory below a common root
    pub fn rebase(&mut self, root: impl Into<PathBuf>) {
        let root = root.into();
        self.repo_dir = rebased(&root, &self.repo_dir, default_repo_dir);
        self.reddit_dir = rebased(&root, &self.reddit_dir, default_reddit_dir);
        self.trends_dir = rebased(&root, &self.trends_dir, default_trends_dir);
        self.file_dir = rebased(&root, &self.file_dir, default_file_dir);
    }
}

// @returns: `root` joined with the last component of `dir`, or the default name when it has none
fn rebased(root: &Path, dir: &Path, default_dir: fn() -> PathBuf) -> PathBuf {
    match dir.file_name() {
        Some(name) => root.join(name),
        None => root.join(default_dir()),
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_available_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::new(ModelProvider::OpenAI),
        ProviderConfig::new(ModelProvider::Anthropic),
        ProviderConfig::new(ModelProvider::Ollama),
        ProviderConfig::new(ModelProvider::LMStudio),
    ]
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_local_timeout_secs() -> u64 {
    180
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000 // doubled on each retry
}

fn default_selector_model() -> String {
    "gpt-4.1-nano".to_string()
}

fn default_synthesizer_model() -> String {
    "gpt-4.1-nano".to_string()
}

fn default_trend_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_synthesizer_temperature() -> f32 {
    0.5
}

fn default_key_sentence_percent() -> u32 {
    15
}

fn default_min_key_sentences() -> usize {
    7
}

fn default_max_key_sentences() -> usize {
    40
}

fn default_max_sentences() -> usize {
    2000
}

fn default_max_input_chars() -> usize {
    200_000
}

fn default_num_trends() -> usize {
    4
}

fn default_post_limit() -> usize {
    10
}

fn default_time_filter() -> String {
    "week".to_string()
}

fn default_comments_per_post() -> usize {
    3
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_post_comment_limit() -> usize {
    10
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_lmstudio_endpoint() -> String {
    // LM Studio default server (OpenAI compatible) runs on port 1234 under /v1
    "http://localhost:1234/v1".to_string()
}

fn default_repo_dir() -> PathBuf {
    PathBuf::from("repo_summaries")
}

fn default_reddit_dir() -> PathBuf {
    PathBuf::from("reddit_summaries")
}

fn default_trends_dir() -> PathBuf {
    PathBuf::from("reddit_trends")
}

fn default_file_dir() -> PathBuf {
    PathBuf::from("file_summaries")
}

/// Time windows accepted by Reddit's top listing
pub const TIME_FILTERS: [&str; 6] = ["hour", "day", "week", "month", "year", "all"];

/// Reject a time filter Reddit does not know
pub fn validate_time_filter(time_filter: &str) -> Result<()> {
    if TIME_FILTERS.contains(&time_filter) {
        Ok(())
    } else {
        Err(anyhow!(
            "Invalid time filter '{}', expected one of: {}",
            time_filter,
            TIME_FILTERS.join(", ")
        ))
    }
}

impl Config {
    /// Load `path`, or write and return the defaults when it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.provider.requires_api_key() && self.get_api_key().is_empty() {
            return Err(anyhow!(
                "API key is required for the {} provider",
                self.provider.display_name()
            ));
        }

        let s = &self.summarization;
        for (name, value) in [
            ("synthesizer_temperature", s.synthesizer_temperature),
            ("analysis_temperature", self.trends.analysis_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(anyhow!("{} must be between 0.0 and 2.0, got {}", name, value));
            }
        }
        if s.key_sentence_percent == 0 || s.key_sentence_percent > 100 {
            return Err(anyhow!("key_sentence_percent must be in 1..=100"));
        }
        if s.min_key_sentences == 0 || s.min_key_sentences > s.max_key_sentences {
            return Err(anyhow!(
                "min_key_sentences ({}) must be positive and not above max_key_sentences ({})",
                s.min_key_sentences, s.max_key_sentences
            ));
        }
        if s.max_sentences == 0 || s.max_input_chars == 0 {
            return Err(anyhow!("Document size limits must be positive"));
        }
        if s.selector_model.is_empty() || s.synthesizer_model.is_empty() {
            return Err(anyhow!("Model names must not be empty"));
        }

        let t = &self.trends;
        if t.num_trends == 0 || t.post_limit == 0 || t.concurrent_requests == 0 {
            return Err(anyhow!("num_trends, post_limit and concurrent_requests must be positive"));
        }
        validate_time_filter(&t.time_filter)
    }

    /// Overlay secrets from the environment.
    ///
    /// `lookup` is `std::env::var` in the binary; tests pass a closure over a map.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("OPENAI_API_KEY") {
            self.provider_config_mut(ModelProvider::OpenAI).api_key = key;
        }
        if let Some(key) = non_empty("ANTHROPIC_API_KEY") {
            self.provider_config_mut(ModelProvider::Anthropic).api_key = key;
        }
        if let Some(id) = non_empty("REDDIT_CLIENT_ID") {
            self.reddit.client_id = id;
        }
        if let Some(secret) = non_empty("REDDIT_CLIENT_SECRET") {
            self.reddit.client_secret = secret;
        }
        if let Some(username) = non_empty("REDDIT_USERNAME") {
            self.reddit.username = username;
        }
    }

    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &ModelProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Mutable access to a provider entry, inserting defaults when missing
    pub fn provider_config_mut(&mut self, provider_type: ModelProvider) -> &mut ProviderConfig {
        let provider_str = provider_type.to_lowercase_string();
        let index = match self.available_providers.iter().position(|p| p.provider_type == provider_str) {
            Some(index) => index,
            None => {
                self.available_providers.push(ProviderConfig::new(provider_type));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[index]
    }

    /// Active provider settings, falling back to defaults for its type
    pub fn active_provider(&self) -> ProviderConfig {
        self.get_active_provider_config()
            .cloned()
            .unwrap_or_else(|| ProviderConfig::new(self.provider))
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        match self.get_active_provider_config() {
            Some(p) if !p.endpoint.is_empty() => p.endpoint.clone(),
            _ => ProviderConfig::new(self.provider).endpoint,
        }
    }

    /// Get the per-call timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        match self.get_active_provider_config() {
            Some(p) if p.timeout_secs > 0 => p.timeout_secs,
            _ => ProviderConfig::new(self.provider).timeout_secs,
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            provider: ModelProvider::default(),
            available_providers: default_available_providers(),
            summarization: SummarizationConfig::default(),
            trends: TrendConfig::default(),
            reddit: RedditConfig::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
