//! Website configuration: built-in defaults and file loading.
//!
//! A config file is a JSON array or a YAML sequence of [`WebsiteConfig`]
//! objects; the format is picked from the file extension (`.yaml`/`.yml`
//! for YAML, anything else JSON). Every loaded set is validated before the
//! pipeline may use it.

use std::collections::HashSet;
use std::path::Path;
use tracing::{info, instrument};

use crate::error::NewsError;
use crate::models::WebsiteConfig;

/// Read, parse and validate a website config file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_websites(path: &Path) -> Result<Vec<WebsiteConfig>, NewsError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| NewsError::io(path, e))?;

    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    let configs = if is_yaml {
        parse_yaml(&raw)?
    } else {
        parse_json(&raw)?
    };

    validate_websites(&configs)?;
    info!(count = configs.len(), "Loaded website configs");
    Ok(configs)
}

pub fn parse_json(raw: &str) -> Result<Vec<WebsiteConfig>, NewsError> {
    Ok(serde_json::from_str(raw)?)
}

pub fn parse_yaml(raw: &str) -> Result<Vec<WebsiteConfig>, NewsError> {
    Ok(serde_yaml::from_str(raw)?)
}

/// Every record must be valid and names must be unique.
pub fn validate_websites(configs: &[WebsiteConfig]) -> Result<(), NewsError> {
    if configs.is_empty() {
        return Err(NewsError::config("no websites configured"));
    }
    let mut seen = HashSet::new();
    for config in configs {
        config.validate()?;
        if !seen.insert(config.name.as_str()) {
            return Err(NewsError::config(format!(
                "duplicate website name `{}`",
                config.name
            )));
        }
    }
    Ok(())
}

fn site(
    name: &str,
    url: &str,
    article_selector: &str,
    title_selector: &str,
    content_selector: &str,
    date_selector: &str,
    date_format: &str,
) -> WebsiteConfig {
    WebsiteConfig {
        name: name.to_string(),
        url: url.to_string(),
        article_selector: article_selector.to_string(),
        title_selector: title_selector.to_string(),
        content_selector: content_selector.to_string(),
        date_selector: date_selector.to_string(),
        date_format: date_format.to_string(),
    }
}

/// AI news sites scraped when no config file is given.
pub fn default_websites() -> Vec<WebsiteConfig> {
    vec![
        site("AI Magazine", "https://aimagazine.com", "article.post", "h2.title", "div.content", "time.published", "%Y-%m-%d"),
        site("Analytics Insight", "https://www.analyticsinsight.net", "div.td_module_10", "h3.entry-title", "div.td-post-content", "time.entry-date", "%B %d, %Y"),
        site("AI Trends", "https://www.aitrends.com", "article.post", "h2.entry-title", "div.entry-content", "time.entry-date", "%Y-%m-%d"),
        site("MIT News - AI", "https://news.mit.edu/topic/artificial-intelligence2", "article.article-item", "h3.title", "div.article-content", "time.article-date", "%B %d, %Y"),
        site("Wired - AI", "https://www.wired.com/tag/artificial-intelligence", "div.summary-item", "h3.summary-item__hed", "div.body__inner-container", "time.summary-item__timestamp", "%Y-%m-%d"),
        site("Dataversity", "https://www.dataversity.net/category/artificial-intelligence", "article.post", "h2.entry-title", "div.entry-content", "time.entry-date", "%B %d, %Y"),
        site("OpenAI Blog", "https://openai.com/blog", "article.post", "h2.post-title", "div.post-content", "time.post-date", "%Y-%m-%d"),
        site("AI News", "https://artificialintelligence-news.com", "article.type-post", "h2.entry-title", "div.entry-content", "time.entry-date", "%B %d, %Y"),
        site("Emerj", "https://emerj.com/ai-sector-overviews", "article.post", "h2.entry-title", "div.entry-content", "time.entry-date", "%B %d, %Y"),
        site("ExtremeTech", "https://www.extremetech.com/tag/artificial-intelligence", "article.article", "h2.title", "div.entry-content", "time.date", "%Y-%m-%d"),
    ]
}
