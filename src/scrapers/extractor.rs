//! Config-driven article extraction.
//!
//! One algorithm serves every site: the [`WebsiteConfig`] selectors say where
//! the article blocks are and where title, content and date live inside each
//! block. A block that cannot be turned into an [`Article`] is logged and
//! skipped; the rest of the page is still extracted.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::error::{ExtractError, NewsError};
use crate::models::{Article, WebsiteConfig};

/// Articles extracted from one page plus the reasons for dropped blocks.
#[derive(Debug, Default)]
pub struct Extraction {
    pub articles: Vec<Article>,
    /// One description per dropped article element, in document order.
    pub skipped: Vec<String>,
}

/// Compiled selectors of one [`WebsiteConfig`].
struct SiteSelectors {
    article: Selector,
    title: Selector,
    content: Selector,
    date: Selector,
    link: Selector,
}

impl SiteSelectors {
    fn compile(config: &WebsiteConfig) -> Result<Self, NewsError> {
        Ok(Self {
            article: compile(&config.article_selector)?,
            title: compile(&config.title_selector)?,
            content: compile(&config.content_selector)?,
            date: compile(&config.date_selector)?,
            link: compile("a")?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector, NewsError> {
    Selector::parse(selector).map_err(|e| NewsError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Extract every article of `html` described by `config`.
///
/// Zero matching blocks gives an empty vector. The only error is a selector
/// that does not compile: HTML itself is always parsed leniently.
pub fn extract(config: &WebsiteConfig, html: &str) -> Result<Vec<Article>, NewsError> {
    extract_report(config, html).map(|extraction| extraction.articles)
}

/// Like [`extract`], but also reports why blocks were dropped.
pub fn extract_report(config: &WebsiteConfig, html: &str) -> Result<Extraction, NewsError> {
    let selectors = SiteSelectors::compile(config)?;
    let base = Url::parse(&config.url).ok();
    let document = Html::parse_document(html);

    let mut extraction = Extraction::default();
    for (index, element) in document.select(&selectors.article).enumerate() {
        match extract_article(config, &selectors, base.as_ref(), element) {
            Ok(article) => {
                debug!(site = %config.name, index, title = %article.title, "Extracted article");
                extraction.articles.push(article);
            }
            Err(e) => {
                warn!(site = %config.name, index, error = %e, "Error processing article element; skipping");
                extraction.skipped.push(format!("element {index}: {e}"));
            }
        }
    }
    Ok(extraction)
}

fn extract_article(
    config: &WebsiteConfig,
    selectors: &SiteSelectors,
    base: Option<&Url>,
    element: ElementRef<'_>,
) -> Result<Article, ExtractError> {
    let title = first_text(element, &selectors.title, "title", &config.title_selector)?;
    let content = first_text(element, &selectors.content, "content", &config.content_selector)?;
    let date_text = first_text(element, &selectors.date, "date", &config.date_selector)?;
    let published_date = parse_date(&date_text, &config.date_format)?;

    let href = element
        .select(&selectors.link)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or(ExtractError::MissingLink)?;
    let url = resolve_link(base, href)?;

    Ok(Article::new(
        title,
        url,
        config.name.clone(),
        published_date,
        content,
    ))
}

/// Trimmed text of the first descendant matching `selector`.
fn first_text(
    element: ElementRef<'_>,
    selector: &Selector,
    field: &'static str,
    raw: &str,
) -> Result<String, ExtractError> {
    element
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .ok_or_else(|| ExtractError::MissingElement {
            field,
            selector: raw.to_string(),
        })
}

/// Absolute links are kept as-is; relative ones are joined onto the site URL.
fn resolve_link(base: Option<&Url>, href: &str) -> Result<String, ExtractError> {
    match Url::parse(href) {
        Ok(absolute) => Ok(absolute.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = base.ok_or_else(|| ExtractError::BadLink {
                href: href.to_string(),
                source: url::ParseError::RelativeUrlWithoutBase,
            })?;
            base.join(href)
                .map(|u| u.to_string())
                .map_err(|source| ExtractError::BadLink {
                    href: href.to_string(),
                    source,
                })
        }
        Err(source) => Err(ExtractError::BadLink {
            href: href.to_string(),
            source,
        }),
    }
}

/// Parse `text` with a strftime-style `format`.
///
/// Formats with an offset yield the local wall-clock time of that offset;
/// date-only formats yield midnight.
pub fn parse_date(text: &str, format: &str) -> Result<NaiveDateTime, ExtractError> {
    if let Ok(dt) = DateTime::parse_from_str(text, format) {
        return Ok(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(text, format)
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|source| ExtractError::BadDate {
            text: text.to_string(),
            format: format.to_string(),
            source,
        })
}
