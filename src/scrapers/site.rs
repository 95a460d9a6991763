//! Fetching configured websites and collecting one [`ScrapingResult`] per site.

use futures::future::join_all;
use rand::{Rng, rng};
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

use super::extractor::extract_report;
use crate::error::NewsError;
use crate::models::{ScrapingResult, WebsiteConfig};

/// Browser-like User-Agent sent with every page request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// HTTP settings for page fetches.
#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Extra attempts after a transient failure (network error, 429, 5xx).
    pub max_retries: usize,
    /// Delay before the first retry; doubled for every further attempt.
    pub retry_delay: Duration,
    pub user_agent: String,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_delay: Duration::from_secs(5),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Scrapes websites described by [`WebsiteConfig`]s.
#[derive(Debug, Clone)]
pub struct Scraper {
    client: Client,
    settings: ScrapeSettings,
}

impl Scraper {
    /// Build the shared HTTP client. Fails only if the TLS backend cannot
    /// be initialised.
    pub fn new(settings: ScrapeSettings) -> Result<Self, NewsError> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &ScrapeSettings {
        &self.settings
    }

    /// Scrape every site concurrently.
    ///
    /// The result has exactly one entry per config, in config order, however
    /// the fetches interleave.
    #[instrument(level = "info", skip_all, fields(sites = configs.len()))]
    pub async fn scrape_all(&self, configs: &[WebsiteConfig]) -> Vec<ScrapingResult> {
        let results = join_all(configs.iter().map(|config| self.scrape_site(config))).await;

        let succeeded = results.iter().filter(|r| r.success).count();
        let articles: usize = results.iter().map(|r| r.articles.len()).sum();
        info!(
            sites = configs.len(),
            succeeded,
            failed = configs.len() - succeeded,
            articles,
            "Scraped all websites"
        );
        results
    }

    /// Scrape one site. Never fails: problems end up in the result.
    #[instrument(level = "info", skip_all, fields(site = %config.name, url = %config.url))]
    pub async fn scrape_site(&self, config: &WebsiteConfig) -> ScrapingResult {
        let t0 = Instant::now();

        let html = match self.fetch_with_retry(&config.url).await {
            Ok(html) => html,
            Err(e) => {
                error!(site = %config.name, error = %e, "Error scraping website");
                return ScrapingResult::failed(e.to_string());
            }
        };

        let extraction = match extract_report(config, &html) {
            Ok(extraction) => extraction,
            Err(e) => {
                error!(site = %config.name, error = %e, "Cannot extract articles");
                return ScrapingResult::failed(e.to_string());
            }
        };

        let kept = extraction.articles.len();
        let skipped = extraction.skipped.len();
        if kept == 0 && skipped > 0 {
            warn!(
                site = %config.name,
                skipped,
                first_error = %extraction.skipped[0],
                "Every article element was dropped; selectors or date_format may have drifted"
            );
        } else if skipped > 0 {
            info!(site = %config.name, kept, skipped, "Some article elements were dropped");
        }

        info!(
            site = %config.name,
            count = kept,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Scraped website"
        );
        ScrapingResult::succeeded(extraction.articles, skipped)
    }

    /// GET `url`, retrying transient failures with exponential backoff.
    async fn fetch_with_retry(&self, url: &str) -> Result<String, NewsError> {
        let mut attempt = 0usize;
        loop {
            match self.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() && attempt < self.settings.max_retries => {
                    attempt += 1;
                    let delay = self
                        .settings
                        .retry_delay
                        .saturating_mul(1 << (attempt - 1).min(16))
                        + Duration::from_millis(rng().random_range(0..=250));
                    warn!(%url, attempt, max = self.settings.max_retries, ?delay, error = %e, "Fetch failed; backing off");
                    sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<String, NewsError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NewsError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        debug!(%url, bytes = body.len(), "Fetched page");
        Ok(body)
    }
}
