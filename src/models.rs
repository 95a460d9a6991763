//! Data models shared by the scraper, the enricher and the outputs.
//!
//! - [`WebsiteConfig`]: declarative description of one news site
//! - [`Article`]: a scraped article, later filled with summary and keywords
//! - [`ScrapingResult`]: per-site outcome of a scrape
//! - [`SearchQuery`]: in-memory filter applied to the final article list

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::NewsError;

/// Configuration for one news website.
///
/// Every selector is a CSS selector evaluated by the extractor. The
/// `date_format` uses chrono's strftime syntax (`%Y-%m-%d`, `%B %d, %Y`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WebsiteConfig {
    /// Display name, copied into [`Article::source`].
    pub name: String,
    /// Page that lists the articles.
    pub url: String,
    /// Selector matching one element per article.
    pub article_selector: String,
    /// Selector for the title, relative to the article element.
    pub title_selector: String,
    /// Selector for the article body, relative to the article element.
    pub content_selector: String,
    /// Selector for the publication date, relative to the article element.
    pub date_selector: String,
    /// Pattern used to parse the date text.
    pub date_format: String,
}

impl WebsiteConfig {
    /// Check that every field is present and that `url` is an absolute
    /// http(s) URL. Selectors are not compiled here.
    pub fn validate(&self) -> Result<(), NewsError> {
        let fields = [
            ("name", &self.name),
            ("url", &self.url),
            ("article_selector", &self.article_selector),
            ("title_selector", &self.title_selector),
            ("content_selector", &self.content_selector),
            ("date_selector", &self.date_selector),
            ("date_format", &self.date_format),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(NewsError::config(format!(
                    "website `{}`: field `{field}` must not be empty",
                    self.name
                )));
            }
        }

        let parsed = Url::parse(&self.url).map_err(|e| {
            NewsError::config(format!("website `{}`: invalid url `{}`: {e}", self.name, self.url))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(NewsError::config(format!(
                "website `{}`: url must be http or https, got `{}`",
                self.name,
                parsed.scheme()
            )));
        }
        Ok(())
    }
}

/// A news article.
///
/// Created by the extractor with an empty `summary` and no `keywords`; the
/// enricher fills both exactly once.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Article {
    /// Content-derived identifier, see [`generate_id`](crate::utils::generate_id).
    pub id: String,
    pub title: String,
    pub url: String,
    /// Name of the [`WebsiteConfig`] the article came from.
    pub source: String,
    pub published_date: NaiveDateTime,
    pub content: String,
    pub summary: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Creation time, overwritten when the article is enriched.
    pub processed_date: DateTime<Local>,
}

impl Article {
    /// Build an unenriched article. The id is derived from `url` and `title`.
    pub fn new(
        title: String,
        url: String,
        source: String,
        published_date: NaiveDateTime,
        content: String,
    ) -> Self {
        Self {
            id: crate::utils::generate_id(&url, &title),
            title,
            url,
            source,
            published_date,
            content,
            summary: String::new(),
            keywords: Vec::new(),
            processed_date: Local::now(),
        }
    }
}

/// Outcome of scraping one website.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapingResult {
    pub success: bool,
    pub articles: Vec<Article>,
    pub errors: Vec<String>,
    /// Matched article elements that were dropped (missing title, bad date, ...).
    pub skipped: usize,
}

impl ScrapingResult {
    pub fn succeeded(articles: Vec<Article>, skipped: usize) -> Self {
        Self {
            success: true,
            articles,
            errors: Vec::new(),
            skipped,
        }
    }

    /// A failed site never carries articles.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            articles: Vec::new(),
            errors: vec![error.into()],
            skipped: 0,
        }
    }
}

/// Filter over enriched articles: free text, date range and sources.
///
/// Unset parts match everything.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Case-insensitive substring searched in title and summary.
    pub query: Option<String>,
    /// Inclusive lower bound on `published_date`.
    pub date_from: Option<NaiveDateTime>,
    /// Inclusive upper bound on `published_date`.
    pub date_to: Option<NaiveDateTime>,
    /// Accepted source names.
    pub sources: Option<Vec<String>>,
}

impl SearchQuery {
    pub fn matches(&self, article: &Article) -> bool {
        let matches_query = match self.query.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(q) => {
                let q = q.to_lowercase();
                article.title.to_lowercase().contains(&q)
                    || article.summary.to_lowercase().contains(&q)
            }
        };

        let matches_date = self.date_from.is_none_or(|from| article.published_date >= from)
            && self.date_to.is_none_or(|to| article.published_date <= to);

        let matches_source = match &self.sources {
            Some(sources) if !sources.is_empty() => sources.iter().any(|s| *s == article.source),
            _ => true,
        };

        matches_query && matches_date && matches_source
    }

    /// Keep the matching articles, in their original order.
    pub fn filter(&self, articles: Vec<Article>) -> Vec<Article> {
        articles.into_iter().filter(|a| self.matches(a)).collect()
    }
}
