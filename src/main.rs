//! Command-line entry point.
//!
//! ```sh
//! GROQ_API_KEY=... ai_news_aggregator -c config/websites.json -o out/articles.json
//! ```
//!
//! 1. **Configuration**: `.env`, CLI flags, website configs
//! 2. **Pipeline**: scrape every site, enrich every article
//! 3. **Filtering**: source, date range and free-text query
//! 4. **Output**: Markdown on stdout, optional JSON file

use ai_news_aggregator::api::{LlmSettings, client_with_backoff};
use ai_news_aggregator::cli::Cli;
use ai_news_aggregator::config::{default_websites, load_websites};
use ai_news_aggregator::enricher::{EnrichSettings, Enricher};
use ai_news_aggregator::outputs::{json, markdown};
use ai_news_aggregator::pipeline::{Pipeline, PipelineOptions};
use ai_news_aggregator::scrapers::{ScrapeSettings, Scraper};
use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("ai_news_aggregator starting up");

    if let Err(e) = dotenvy::dotenv() {
        debug!(error = %e, "No .env file loaded");
    }

    // Parse CLI (GROQ_API_KEY is required here)
    let args = Cli::parse();
    debug!(?args.config, ?args.json_output, "Parsed CLI arguments");

    // ---- Website configs ----
    let websites = match &args.config {
        Some(path) => load_websites(path).await.inspect_err(|e| {
            error!(path = %path.display(), error = %e, "Invalid website configuration");
        })?,
        None => {
            info!("No config file given; using built-in websites");
            default_websites()
        }
    };

    // ---- Clients ----
    let llm_settings = LlmSettings {
        api_base: args.api_base.clone(),
        model: args.model.clone(),
        ..LlmSettings::new(args.api_key.clone())
    };
    let llm = client_with_backoff(&llm_settings)?;
    info!(?llm_settings, "LLM client ready");

    let scraper = Scraper::new(ScrapeSettings {
        request_timeout: Duration::from_secs(args.request_timeout),
        max_retries: args.max_retries,
        retry_delay: Duration::from_secs(args.retry_delay),
        ..Default::default()
    })?;
    let enricher = Enricher::new(
        llm,
        EnrichSettings {
            concurrency: args.concurrency,
            ..Default::default()
        },
    );
    let pipeline = Pipeline::new(
        scraper,
        enricher,
        PipelineOptions {
            overall_timeout: args.timeout.map(Duration::from_secs),
        },
    );

    // ---- Run ----
    let articles = pipeline.run(&websites).await;
    let total = articles.len();

    let query = args.search_query(Local::now().naive_local());
    let filtered = query.filter(articles);
    info!(total, shown = filtered.len(), "Filtered articles");

    // ---- Output ----
    if let Some(path) = &args.json_output {
        json::write_articles(&filtered, path).await?;
    }
    println!("{}", markdown::articles_to_markdown(&filtered));

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}
