//! Output generation for enriched articles.
//!
//! # Submodules
//!
//! - [`json`]: writes the article list to a JSON file for other tools
//! - [`markdown`]: renders the article list for reading in a terminal or
//!   any Markdown viewer

pub mod json;
pub mod markdown;
