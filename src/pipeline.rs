//! Scrape, flatten, enrich.
//!
//! Two barrier stages: every site is scraped (concurrently) before any
//! article is enriched (concurrently). The returned order is site order,
//! then document order within a site.

use futures::future::join_all;
use std::time::{Duration, Instant as StdInstant};
use tokio::time::{Instant, timeout_at};
use tracing::{info, instrument, warn};

use crate::api::AskAsync;
use crate::enricher::Enricher;
use crate::error::NewsError;
use crate::models::{Article, ScrapingResult, WebsiteConfig};
use crate::scrapers::Scraper;

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Deadline for the whole run. Sites still loading when it expires count
    /// as failed; articles still being enriched come back degraded.
    pub overall_timeout: Option<Duration>,
}

/// Runs the scrape and enrichment stages end to end.
#[derive(Debug)]
pub struct Pipeline<A> {
    scraper: Scraper,
    enricher: Enricher<A>,
    options: PipelineOptions,
}

impl<A: AskAsync> Pipeline<A> {
    pub fn new(scraper: Scraper, enricher: Enricher<A>, options: PipelineOptions) -> Self {
        Self {
            scraper,
            enricher,
            options,
        }
    }

    /// Scrape every site, enrich every article, return them all.
    ///
    /// Never fails; per-site and per-call problems are logged and show up
    /// as missing articles or degraded summaries.
    #[instrument(level = "info", skip_all, fields(sites = configs.len()))]
    pub async fn run(&self, configs: &[WebsiteConfig]) -> Vec<Article> {
        let t0 = StdInstant::now();
        let deadline = self.options.overall_timeout.map(|t| Instant::now() + t);

        let results = self.scrape_all_until(configs, deadline).await;
        let articles = flatten_successful(results);
        info!(count = articles.len(), "Total articles to enrich");

        let enriched = self.enricher.enrich_all_until(articles, deadline).await;
        info!(
            count = enriched.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Pipeline complete"
        );
        enriched
    }

    async fn scrape_all_until(
        &self,
        configs: &[WebsiteConfig],
        deadline: Option<Instant>,
    ) -> Vec<ScrapingResult> {
        let Some(deadline) = deadline else {
            return self.scraper.scrape_all(configs).await;
        };

        join_all(configs.iter().map(|config| async move {
            match timeout_at(deadline, self.scraper.scrape_site(config)).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(site = %config.name, "Pipeline deadline reached while scraping");
                    ScrapingResult::failed(NewsError::Timeout.to_string())
                }
            }
        }))
        .await
    }
}

/// Articles of successful sites, site order then document order.
pub fn flatten_successful(results: Vec<ScrapingResult>) -> Vec<Article> {
    results
        .into_iter()
        .filter(|r| r.success)
        .flat_map(|r| r.articles)
        .collect()
}
