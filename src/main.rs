// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::builder::PossibleValuesParser;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use tracesum::app_config::{self, Config, ModelProvider};
use tracesum::app_controller::{Controller, TrendOptions};

/// CLI Wrapper for ModelProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliModelProvider {
    Ollama,
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
    #[value(name = "lmstudio")]
    LMStudio,
}

impl From<CliModelProvider> for ModelProvider {
    fn from(cli_provider: CliModelProvider) -> Self {
        match cli_provider {
            CliModelProvider::Ollama => ModelProvider::Ollama,
            CliModelProvider::OpenAI => ModelProvider::OpenAI,
            CliModelProvider::Anthropic => ModelProvider::Anthropic,
            CliModelProvider::LMStudio => ModelProvider::LMStudio,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize the README of a GitHub repository
    Github {
        /// Repository URL, e.g. https://github.com/user/repo
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Summarize a Reddit post and its top comments
    Reddit {
        /// Post URL or bare post id
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Summarize a local Markdown/text file, or every such file in a directory
    File {
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Force overwrite of existing reports in directory mode
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Build a trend report from the top posts of a subreddit
    Trends {
        /// Subreddit name without the r/ prefix
        #[arg(value_name = "SUBREDDIT")]
        subreddit: String,

        /// Number of top posts to scrape
        #[arg(long)]
        limit: Option<usize>,

        /// Reddit time filter
        #[arg(long, value_parser = PossibleValuesParser::new(app_config::TIME_FILTERS))]
        time_filter: Option<String>,

        /// Number of trends to identify
        #[arg(long = "trends")]
        num_trends: Option<usize>,
    },

    /// Generate shell completions for tracesum
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// tracesum - Traceable summaries with sentence-level citations
///
/// Summarizes documents in two passes: key sentences are selected by identifier,
/// then rewritten into prose that cites those identifiers.
#[derive(Parser, Debug)]
#[command(name = "tracesum")]
#[command(version)]
#[command(about = "Traceable, citation-backed summaries of READMEs, Reddit posts and documents")]
#[command(long_about = "tracesum summarizes documents so that every sentence of the summary cites the source sentences it came from.

EXAMPLES:
    tracesum github https://github.com/user/repo     # Summarize a repository README
    tracesum reddit https://redd.it/abc123            # Summarize a Reddit discussion
    tracesum file notes/                              # Summarize every .md/.txt file in a folder
    tracesum trends rust --limit 25 --trends 5        # Trend report for r/rust
    tracesum -p ollama file README.md                 # Use a local model
    tracesum completions bash > tracesum.bash         # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't exist,
    a default one is created. API keys and Reddit credentials are read from the
    environment (or a .env file): OPENAI_API_KEY, ANTHROPIC_API_KEY,
    REDDIT_CLIENT_ID, REDDIT_CLIENT_SECRET, REDDIT_USERNAME.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Model provider to use
    #[arg(short, long, global = true, value_enum)]
    provider: Option<CliModelProvider>,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Root directory for all reports
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Marker and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌", "1;31"),
            Level::Warn => ("🚧", "1;33"),
            Level::Info => ("  ", "1;32"),
            Level::Debug => ("🔍", "1;36"),
            Level::Trace => ("📋", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (marker, color) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, marker, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Install at the most verbose level; the effective level is set through log::set_max_level
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logger: {}", e);
        return ExitCode::FAILURE;
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: CommandLineOptions) -> Result<()> {
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "tracesum", &mut std::io::stdout());
        return Ok(());
    }

    // If log level is set via command line, apply it immediately
    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.into());
    }

    // A missing .env file is normal
    let _ = dotenvy::dotenv();

    let config = load_config(&cli)?;
    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.into());
    }
    info!("Using {} provider", config.provider.display_name());

    let controller = Controller::with_config(config)?;
    if let Err(e) = controller.test_connection().await {
        warn!("{:#}; continuing anyway", e);
    }

    match cli.command {
        Commands::Github { url } => {
            controller.summarize_github(&url).await?;
        }
        Commands::Reddit { url } => {
            controller.summarize_reddit_post(&url).await?;
        }
        Commands::File { path, force_overwrite } => {
            let outcome = controller.summarize_path(&path, force_overwrite).await?;
            if outcome.processed == 0 && outcome.failed > 0 {
                anyhow::bail!("No document could be summarized ({} failed)", outcome.failed);
            }
        }
        Commands::Trends { subreddit, limit, time_filter, num_trends } => {
            let options = TrendOptions { limit, time_filter, num_trends };
            if controller.trend_report(&subreddit, &options).await?.is_none() {
                anyhow::bail!("No trend report was generated for r/{}", subreddit);
            }
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Load or create the configuration file, then apply environment and CLI overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config)?;

    config.apply_env_overrides(|key| std::env::var(key).ok());

    if let Some(provider) = &cli.provider {
        config.provider = provider.clone().into();
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(root) = &cli.output_dir {
        config.output.rebase(root);
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}
