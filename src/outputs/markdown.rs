//! Markdown rendering of enriched articles.
//!
//! Articles are grouped under one heading per source (alphabetical); inside a
//! group they keep the order they were given in.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::models::Article;

/// Render `articles` as a Markdown document.
pub fn articles_to_markdown(articles: &[Article]) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "# AI News\n");

    if articles.is_empty() {
        let _ = writeln!(md, "_No articles matched._");
        return md;
    }

    let mut by_source: BTreeMap<&str, Vec<&Article>> = BTreeMap::new();
    for article in articles {
        by_source.entry(article.source.as_str()).or_default().push(article);
    }

    for (source, group) in by_source {
        let _ = writeln!(md, "## {source}\n");
        for article in group {
            write_article(&mut md, article);
        }
    }
    md
}

fn write_article(md: &mut String, article: &Article) {
    let _ = writeln!(md, "### {}\n", article.title);
    let _ = writeln!(
        md,
        "**Published:** {}\n",
        article.published_date.format("%Y-%m-%d %H:%M")
    );
    let _ = writeln!(md, "{}\n", article.summary);
    if !article.keywords.is_empty() {
        let _ = writeln!(md, "**Keywords:** {}\n", article.keywords.join(", "));
    }
    let _ = writeln!(md, "[Read full article]({})\n", article.url);
    let _ = writeln!(md, "---\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn article(title: &str, source: &str) -> Article {
        let date = NaiveDate::from_ymd_opt(2025, 5, 6)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        let mut a = Article::new(
            title.to_string(),
            format!("https://example.com/{title}"),
            source.to_string(),
            date,
            "Body".to_string(),
        );
        a.summary = format!("Summary of {title}");
        a.keywords = vec!["ai".to_string(), "policy".to_string()];
        a
    }

    #[test]
    fn test_renders_article_fields() {
        let md = articles_to_markdown(&[article("Chips", "Wired - AI")]);
        assert!(md.contains("## Wired - AI"));
        assert!(md.contains("### Chips"));
        assert!(md.contains("**Published:** 2025-05-06 14:30"));
        assert!(md.contains("Summary of Chips"));
        assert!(md.contains("**Keywords:** ai, policy"));
        assert!(md.contains("[Read full article](https://example.com/Chips)"));
    }

    #[test]
    fn test_groups_by_source_alphabetically() {
        let md = articles_to_markdown(&[
            article("z-first", "Wired - AI"),
            article("a-second", "AI News"),
            article("z-third", "Wired - AI"),
        ]);
        let ai_news = md.find("## AI News").unwrap();
        let wired = md.find("## Wired - AI").unwrap();
        assert!(ai_news < wired);
        assert!(md.find("### z-first").unwrap() < md.find("### z-third").unwrap());
    }

    #[test]
    fn test_empty_list() {
        assert!(articles_to_markdown(&[]).contains("No articles matched"));
    }
}
