//! JSON output of the enriched article list.
//!
//! The file is a single pretty-printed array of
//! [`Article`](crate::models::Article) objects, overwritten on every run.

use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

use crate::error::NewsError;
use crate::models::Article;
use crate::utils::ensure_writable_parent;

/// Write `articles` to `path` as pretty JSON, creating parent directories.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = articles.len()))]
pub async fn write_articles(articles: &[Article], path: &Path) -> Result<(), NewsError> {
    ensure_writable_parent(path).await?;
    let json = serde_json::to_string_pretty(articles)?;
    fs::write(path, json)
        .await
        .map_err(|e| NewsError::io(path, e))?;
    info!("Wrote JSON article file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_write_articles_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/articles.json");
        let date = NaiveDate::from_ymd_opt(2025, 5, 6)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let mut article = Article::new(
            "Title".to_string(),
            "https://example.com/a".to_string(),
            "AI News".to_string(),
            date,
            "Body".to_string(),
        );
        article.summary = "Summary".to_string();
        article.keywords = vec!["ai".to_string()];

        write_articles(std::slice::from_ref(&article), &path).await.unwrap();

        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        let back: Vec<Article> = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].id, article.id);
        assert_eq!(back[0].keywords, vec!["ai"]);
    }
}
