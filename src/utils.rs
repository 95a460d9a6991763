//! Helpers for article identity, deduplication, string truncation and
//! output path validation.

use itertools::Itertools;
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};

use crate::error::NewsError;
use crate::models::Article;

/// Derive the stable identifier of an article.
///
/// SHA-256 over the bytes of `url` immediately followed by `title`, with no
/// separator, rendered as 64 lowercase hex characters. The id is the only key
/// used to recognise the same article across scrapes.
///
/// # Examples
///
/// ```
/// use ai_news_aggregator::utils::generate_id;
///
/// let a = generate_id("https://x/a", "T");
/// assert_eq!(a, generate_id("https://x/a", "T"));
/// assert_ne!(a, generate_id("https://x/b", "T"));
/// ```
pub fn generate_id(url: &str, title: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hasher.update(title.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Drop articles whose id was already seen, keeping first-seen order.
pub fn dedup_articles(articles: Vec<Article>) -> Vec<Article> {
    let before = articles.len();
    let unique = articles
        .into_iter()
        .unique_by(|a| a.id.clone())
        .collect::<Vec<_>>();
    if unique.len() < before {
        debug!(dropped = before - unique.len(), "Dropped duplicate articles");
    }
    unique
}

/// Longest prefix of `s` that is at most `max` bytes and ends on a char boundary.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes with an ellipsis and the
/// number of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let head = truncate_chars(s, max);
    if head.len() == s.len() {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", head, s.len() - head.len())
    }
}

/// Ensure the directory that will hold `file` exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
#[instrument(level = "info", skip_all, fields(file = %file.display()))]
pub async fn ensure_writable_parent(file: &Path) -> Result<(), NewsError> {
    let dir = match file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    fs::create_dir_all(&dir)
        .await
        .map_err(|e| NewsError::io(&dir, e))?;

    let probe = dir.join("..__probe_write__");
    fs::write(&probe, b"")
        .await
        .map_err(|e| NewsError::io(&probe, e))?;
    let _ = fs::remove_file(&probe).await;
    info!(dir = %dir.display(), "Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_generate_id_is_deterministic() {
        let a = generate_id("https://x/a", "T");
        let b = generate_id("https://x/a", "T");
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_id_depends_on_both_inputs() {
        let base = generate_id("https://x/a", "T");
        assert_ne!(base, generate_id("https://x/b", "T"));
        assert_ne!(base, generate_id("https://x/a", "U"));
    }

    #[test]
    fn test_generate_id_is_plain_concatenation() {
        // url then title, no separator
        assert_eq!(generate_id("ab", "c"), generate_id("a", "bc"));
        assert_ne!(generate_id("a", "b"), generate_id("b", "a"));
    }

    #[test]
    fn test_generate_id_format() {
        let id = generate_id("https://example.com", "Title");
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_generate_id_known_value() {
        // SHA-256 of the empty input
        assert_eq!(
            generate_id("", ""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_dedup_keeps_first_seen() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mk = |url: &str, title: &str, source: &str| {
            Article::new(
                title.to_string(),
                url.to_string(),
                source.to_string(),
                date,
                String::new(),
            )
        };
        let articles = vec![
            mk("https://x/1", "One", "A"),
            mk("https://x/2", "Two", "A"),
            mk("https://x/1", "One", "B"),
        ];
        let unique = dedup_articles(articles);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].source, "A");
        assert_eq!(unique[1].title, "Two");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        // 'é' is two bytes
        let s = "éééé";
        assert_eq!(truncate_chars(s, 3), "é");
        assert_eq!(truncate_chars(s, 4), "éé");
        assert_eq!(truncate_chars(s, 100), s);
    }

    #[tokio::test]
    async fn test_ensure_writable_parent_creates_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("nested/out/articles.json");
        ensure_writable_parent(&file).await.unwrap();
        assert!(tmp.path().join("nested/out").is_dir());
    }
}
