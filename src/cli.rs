//! Command-line interface definitions.
//!
//! All arguments can be provided via command-line flags; secrets and
//! endpoints can also come from environment variables (or a `.env` file).

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use clap::Parser;
use std::path::PathBuf;

use crate::api::{DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::models::SearchQuery;

/// Scrape AI news sites, summarize every article with an LLM and print the
/// filtered result as Markdown.
///
/// # Examples
///
/// ```sh
/// # Built-in site list, last 7 days, printed to stdout
/// ai_news_aggregator
///
/// # Own site list, only two sources, also written to JSON
/// ai_news_aggregator -c config/websites.json -s "Wired - AI" -s "AI News" -o out/articles.json
///
/// # Free-text search within an explicit date range
/// ai_news_aggregator -q robotics --from 2025-05-01 --to 2025-05-07
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Website config file (JSON array or YAML sequence); built-in sites if omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// API key for the LLM provider
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "LLM_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Model used for summaries and keywords
    #[arg(long, env = "LLM_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Per-request timeout for page fetches, in seconds
    #[arg(long, default_value_t = 30)]
    pub request_timeout: u64,

    /// Retries for transient fetch failures
    #[arg(long, default_value_t = 3)]
    pub max_retries: usize,

    /// Delay before the first fetch retry, in seconds
    #[arg(long, default_value_t = 5)]
    pub retry_delay: u64,

    /// Overall deadline for the run, in seconds; partial results are kept
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Maximum number of articles enriched at once (default: all)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Only show articles whose title or summary contains this text
    #[arg(short, long)]
    pub query: Option<String>,

    /// Only show articles from this source (repeatable)
    #[arg(short, long = "source")]
    pub sources: Vec<String>,

    /// Earliest publication date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest publication date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Show articles from the last N days when --from is not given
    #[arg(long, default_value_t = 7)]
    pub days: i64,

    /// Also write the filtered articles to this JSON file
    #[arg(short = 'o', long)]
    pub json_output: Option<PathBuf>,
}

impl Cli {
    /// Filter described by the arguments, relative to `now`.
    pub fn search_query(&self, now: NaiveDateTime) -> SearchQuery {
        let date_from = match self.from {
            Some(day) => day.and_time(NaiveTime::MIN),
            None => (now - Duration::days(self.days)).date().and_time(NaiveTime::MIN),
        };
        let date_to = self
            .to
            .and_then(|day| day.and_hms_opt(23, 59, 59));

        SearchQuery {
            query: self.query.clone().filter(|q| !q.trim().is_empty()),
            date_from: Some(date_from),
            date_to,
            sources: (!self.sources.is_empty()).then(|| self.sources.clone()),
        }
    }
}
