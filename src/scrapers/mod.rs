//! Configuration-driven website scraping.
//!
//! Instead of one module per news outlet, every site is described by a
//! [`WebsiteConfig`](crate::models::WebsiteConfig) and handled by the same
//! two pieces:
//!
//! 1. [`site::Scraper`]: fetches each configured page (timeout, User-Agent,
//!    bounded retry) and turns the outcome into a
//!    [`ScrapingResult`](crate::models::ScrapingResult)
//! 2. [`extractor`]: maps the fetched HTML onto [`Article`](crate::models::Article)s
//!    using the config's CSS selectors and date format
//!
//! # Failure isolation
//!
//! | Level | Example | Effect |
//! |-------|---------|--------|
//! | Site | network error, HTTP 500, bad selector | that site's result has `success = false` |
//! | Element | missing title, unparseable date, no link | element skipped and counted in `skipped` |

pub mod extractor;
pub mod site;

pub use extractor::{extract, extract_report};
pub use site::{ScrapeSettings, Scraper};
