//! # AI News Aggregator
//!
//! Scrapes news articles from a configurable set of websites, enriches every
//! article with an LLM-generated summary and keyword list, and hands back a
//! list the caller can filter by source, date range and free text.
//!
//! ## Architecture
//!
//! The pipeline has two barrier stages:
//! 1. **Scraping**: every [`WebsiteConfig`](models::WebsiteConfig) is fetched
//!    concurrently and mapped onto articles by CSS selectors
//!    ([`scrapers`])
//! 2. **Enrichment**: every article gets a summary and keywords from two
//!    independent LLM calls, all articles concurrently ([`enricher`])
//!
//! [`pipeline::Pipeline`] wires both together. Failures of a site, an article
//! element or an LLM call are absorbed and logged; the run always returns a
//! best-effort article list.

pub mod api;
pub mod cli;
pub mod config;
pub mod enricher;
pub mod error;
pub mod models;
pub mod outputs;
pub mod pipeline;
pub mod scrapers;
pub mod utils;
