//! AI enrichment: a summary and a keyword list for every article.
//!
//! Each article costs two independent LLM calls. A failure in one call never
//! affects the other, and no failure ever escapes [`Enricher::enrich`]: a
//! failed summary becomes [`SUMMARY_FAILED`], failed keywords become an
//! empty list.

use chrono::Local;
use futures::stream::{self, StreamExt};
use tokio::time::{Instant, timeout_at};
use tracing::{error, info, instrument, warn};

use crate::api::AskAsync;
use crate::error::ApiError;
use crate::models::Article;
use crate::utils::truncate_chars;

/// Summary stored on an article whose summary call failed.
pub const SUMMARY_FAILED: &str = "Error generating summary";

const SUMMARY_MAX_TOKENS: u32 = 500;
const KEYWORDS_MAX_TOKENS: u32 = 100;

/// Enrichment knobs.
#[derive(Debug, Clone)]
pub struct EnrichSettings {
    /// Content longer than this many bytes is cut before prompting.
    pub max_content_chars: usize,
    /// Upper bound on articles enriched at once; `None` means all of them.
    pub concurrency: Option<usize>,
}

impl Default for EnrichSettings {
    fn default() -> Self {
        Self {
            max_content_chars: 12_000,
            concurrency: None,
        }
    }
}

/// Fills `summary` and `keywords` through an [`AskAsync`] backend.
#[derive(Debug)]
pub struct Enricher<A> {
    llm: A,
    settings: EnrichSettings,
}

impl<A: AskAsync> Enricher<A> {
    pub fn new(llm: A, settings: EnrichSettings) -> Self {
        Self { llm, settings }
    }

    fn summary_prompt(&self, content: &str) -> String {
        format!(
            "Please provide a concise summary of the following article.\n\
             Focus on the key points and main takeaways. Keep the summary under 200 words.\n\n\
             Article:\n{}",
            truncate_chars(content, self.settings.max_content_chars)
        )
    }

    fn keywords_prompt(&self, content: &str) -> String {
        format!(
            "Please extract 5-7 relevant keywords from the following article content.\n\
             Return only the keywords as a comma-separated list.\n\n\
             Article:\n{}",
            truncate_chars(content, self.settings.max_content_chars)
        )
    }

    /// Ask the model for a summary of `content`.
    pub async fn summarize(&self, content: &str) -> Result<String, ApiError> {
        self.llm
            .ask(&self.summary_prompt(content), SUMMARY_MAX_TOKENS)
            .await
    }

    /// Ask the model for 5-7 keywords describing `content`.
    pub async fn extract_keywords(&self, content: &str) -> Result<Vec<String>, ApiError> {
        let response = self
            .llm
            .ask(&self.keywords_prompt(content), KEYWORDS_MAX_TOKENS)
            .await?;
        Ok(parse_keywords(&response))
    }

    /// Fill `summary`, `keywords` and `processed_date`. Never fails.
    #[instrument(level = "info", skip_all, fields(title = %article.title, url = %article.url))]
    pub async fn enrich(&self, mut article: Article) -> Article {
        let (summary, keywords) = tokio::join!(
            self.summarize(&article.content),
            self.extract_keywords(&article.content)
        );

        article.summary = summary.unwrap_or_else(|e| {
            error!(title = %article.title, url = %article.url, error = %e, "Error generating summary");
            SUMMARY_FAILED.to_string()
        });
        article.keywords = keywords.unwrap_or_else(|e| {
            error!(title = %article.title, url = %article.url, error = %e, "Error extracting keywords");
            Vec::new()
        });
        article.processed_date = Local::now();
        article
    }

    /// Enrich every article concurrently, keeping input order.
    pub async fn enrich_all(&self, articles: Vec<Article>) -> Vec<Article> {
        self.enrich_all_until(articles, None).await
    }

    /// Like [`enrich_all`](Self::enrich_all), but articles still pending at
    /// `deadline` come back degraded (sentinel summary, no keywords).
    #[instrument(level = "info", skip_all, fields(count = articles.len()))]
    pub async fn enrich_all_until(
        &self,
        articles: Vec<Article>,
        deadline: Option<Instant>,
    ) -> Vec<Article> {
        let total = articles.len();
        let limit = self.settings.concurrency.unwrap_or(total).max(1);
        info!(total, limit, "Enriching articles");

        let enriched: Vec<Article> = stream::iter(articles)
            .map(|article| async move {
                match deadline {
                    None => self.enrich(article).await,
                    Some(deadline) => {
                        let fallback = article.clone();
                        match timeout_at(deadline, self.enrich(article)).await {
                            Ok(done) => done,
                            Err(_) => {
                                warn!(title = %fallback.title, url = %fallback.url, "Enrichment deadline reached");
                                degraded(fallback)
                            }
                        }
                    }
                }
            })
            .buffered(limit)
            .collect()
            .await;

        let failed = enriched.iter().filter(|a| a.summary == SUMMARY_FAILED).count();
        info!(total, summaries_failed = failed, "Enrichment finished");
        enriched
    }
}

fn degraded(mut article: Article) -> Article {
    article.summary = SUMMARY_FAILED.to_string();
    article.keywords = Vec::new();
    article.processed_date = Local::now();
    article
}

/// Split a comma-separated completion into keywords.
///
/// Tokens are trimmed and empty ones dropped. Repeats are kept, in the
/// order the model returned them.
pub fn parse_keywords(response: &str) -> Vec<String> {
    response
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Answers summary and keyword prompts from fixed results.
    struct Stub {
        summary: Option<&'static str>,
        keywords: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl Stub {
        fn new(summary: Option<&'static str>, keywords: Option<&'static str>) -> Self {
            Self {
                summary,
                keywords,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl AskAsync for Stub {
        async fn ask(&self, prompt: &str, max_tokens: u32) -> Result<String, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let answer = if prompt.contains("keywords") {
                assert_eq!(max_tokens, KEYWORDS_MAX_TOKENS);
                self.keywords
            } else {
                assert_eq!(max_tokens, SUMMARY_MAX_TOKENS);
                self.summary
            };
            answer
                .map(str::to_string)
                .ok_or_else(|| ApiError::Status {
                    status: 500,
                    body: "boom".to_string(),
                })
        }
    }

    /// Sleeps longer for articles whose content says "slow".
    struct Delayed;

    impl AskAsync for Delayed {
        async fn ask(&self, prompt: &str, _max_tokens: u32) -> Result<String, ApiError> {
            let wait = if prompt.contains("slow") { 200 } else { 5 };
            tokio::time::sleep(Duration::from_millis(wait)).await;
            let marker = prompt.lines().last().unwrap_or_default().to_string();
            Ok(marker)
        }
    }

    fn article(title: &str, content: &str) -> Article {
        let date = NaiveDate::from_ymd_opt(2025, 5, 6)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Article::new(
            title.to_string(),
            format!("https://example.com/{title}"),
            "AI News".to_string(),
            date,
            content.to_string(),
        )
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(
            parse_keywords(" AI, machine learning ,GPUs,, AI "),
            vec!["AI", "machine learning", "GPUs", "AI"]
        );
        assert_eq!(parse_keywords("AI, ,AI, ml"), vec!["AI", "AI", "ml"]);
        assert!(parse_keywords("   ").is_empty());
    }

    #[tokio::test]
    async fn test_enrich_fills_both_fields() {
        let enricher = Enricher::new(
            Stub::new(Some("Short summary."), Some("ai, chips, nvidia")),
            EnrichSettings::default(),
        );
        let before = article("GPU", "Nvidia ships a chip");
        let created = before.processed_date;
        let enriched = enricher.enrich(before).await;

        assert_eq!(enriched.summary, "Short summary.");
        assert_eq!(enriched.keywords, vec!["ai", "chips", "nvidia"]);
        assert!(enriched.processed_date >= created);
        assert_eq!(enricher.llm.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_summary_failure_does_not_block_keywords() {
        let enricher = Enricher::new(Stub::new(None, Some("ai, policy")), EnrichSettings::default());
        let enriched = enricher.enrich(article("Policy", "EU AI act")).await;

        assert_eq!(enriched.summary, SUMMARY_FAILED);
        assert_eq!(enriched.keywords, vec!["ai", "policy"]);
    }

    #[tokio::test]
    async fn test_keyword_failure_does_not_block_summary() {
        let enricher = Enricher::new(Stub::new(Some("Fine."), None), EnrichSettings::default());
        let enriched = enricher.enrich(article("Fine", "content")).await;

        assert_eq!(enriched.summary, "Fine.");
        assert!(enriched.keywords.is_empty());
    }

    #[tokio::test]
    async fn test_both_failures_still_return_article() {
        let enricher = Enricher::new(Stub::new(None, None), EnrichSettings::default());
        let original = article("Down", "content");
        let enriched = enricher.enrich(original.clone()).await;

        assert_eq!(enriched.id, original.id);
        assert_eq!(enriched.summary, SUMMARY_FAILED);
        assert!(enriched.keywords.is_empty());
    }

    #[tokio::test]
    async fn test_re_enrichment_is_idempotent() {
        let enricher = Enricher::new(
            Stub::new(Some("Same summary."), Some("a, b")),
            EnrichSettings::default(),
        );
        let first = enricher.enrich(article("Same", "content")).await;
        let second = enricher.enrich(first.clone()).await;

        assert_eq!(first.summary, second.summary);
        assert_eq!(first.keywords, second.keywords);
    }

    #[tokio::test]
    async fn test_enrich_all_preserves_input_order() {
        let enricher = Enricher::new(Delayed, EnrichSettings::default());
        let articles = vec![
            article("first", "slow one"),
            article("second", "fast two"),
            article("third", "fast three"),
        ];
        let enriched = enricher.enrich_all(articles).await;

        let titles: Vec<_> = enriched.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
        assert_eq!(enriched[0].summary, "slow one");
        assert_eq!(enriched[2].summary, "fast three");
    }

    #[tokio::test]
    async fn test_enrich_all_runs_concurrently() {
        let enricher = Enricher::new(Delayed, EnrichSettings::default());
        let articles: Vec<_> = (0..5).map(|i| article(&format!("a{i}"), "slow")).collect();

        let t0 = std::time::Instant::now();
        let enriched = enricher.enrich_all(articles).await;
        assert_eq!(enriched.len(), 5);
        // Five sequential articles would take at least a second.
        assert!(t0.elapsed() < Duration::from_millis(900));
    }

    #[tokio::test]
    async fn test_deadline_degrades_pending_articles() {
        let enricher = Enricher::new(Delayed, EnrichSettings::default());
        let articles = vec![article("quick", "fast"), article("late", "slow")];
        let deadline = Instant::now() + Duration::from_millis(100);

        let enriched = enricher.enrich_all_until(articles, Some(deadline)).await;
        assert_eq!(enriched.len(), 2);
        assert_eq!(enriched[0].summary, "fast");
        assert_eq!(enriched[1].title, "late");
        assert_eq!(enriched[1].summary, SUMMARY_FAILED);
    }

    #[test]
    fn test_prompt_content_is_truncated() {
        let enricher = Enricher::new(
            Stub::new(None, None),
            EnrichSettings {
                max_content_chars: 10,
                concurrency: None,
            },
        );
        let prompt = enricher.summary_prompt(&"x".repeat(50));
        assert!(prompt.ends_with(&"x".repeat(10)));
        assert!(!prompt.contains(&"x".repeat(11)));
        assert!(prompt.contains("under 200 words"));
    }
}
