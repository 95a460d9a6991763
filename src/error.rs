//! Error types for the scraping and enrichment pipeline.
//!
//! Errors are split by how far they are allowed to travel:
//!
//! - [`NewsError`]: startup and site-level failures. Startup errors reach
//!   `main`; site-level ones are folded into a failed
//!   [`ScrapingResult`](crate::models::ScrapingResult).
//! - [`ExtractError`]: a single matched article element could not be turned
//!   into an [`Article`](crate::models::Article). Logged and skipped.
//! - [`ApiError`]: one LLM call failed. Converted into a sentinel summary or
//!   an empty keyword list at the enrichment boundary.

use std::path::PathBuf;

/// Startup and site-level errors.
#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    /// Missing or malformed configuration (API key, website configs).
    #[error("config error: {0}")]
    Config(String),

    /// Transport failure while fetching a site.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The site answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// A configured CSS selector does not compile.
    #[error("invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },

    /// A pipeline deadline expired before the site finished.
    #[error("timed out")]
    Timeout,

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl NewsError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Wrap a `std::io::Error` with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether a retry has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Why one matched article element was dropped.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("no element matches {field} selector `{selector}`")]
    MissingElement {
        field: &'static str,
        selector: String,
    },

    #[error("no link (<a href>) inside article element")]
    MissingLink,

    #[error("cannot resolve link `{href}`: {source}")]
    BadLink {
        href: String,
        source: url::ParseError,
    },

    #[error("cannot parse date `{text}` with format `{format}`: {source}")]
    BadDate {
        text: String,
        format: String,
        source: chrono::ParseError,
    },
}

/// Failure of a single LLM completion call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Network errors, rate limits and 5xx are worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Malformed(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transience() {
        let rate_limited = NewsError::Status {
            status: 429,
            url: "https://example.com".to_string(),
        };
        let not_found = NewsError::Status {
            status: 404,
            url: "https://example.com".to_string(),
        };
        assert!(rate_limited.is_transient());
        assert!(!not_found.is_transient());
        assert!(!NewsError::config("x").is_transient());
    }

    #[test]
    fn test_api_error_transience() {
        let server_error = ApiError::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        let bad_request = ApiError::Status {
            status: 400,
            body: "bad".to_string(),
        };
        assert!(server_error.is_transient());
        assert!(!bad_request.is_transient());
        assert!(!ApiError::Malformed("no choices".to_string()).is_transient());
    }

    #[test]
    fn test_display_includes_context() {
        let err = NewsError::Status {
            status: 500,
            url: "https://site.test/".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 500 from https://site.test/");

        let err = ExtractError::MissingElement {
            field: "date",
            selector: "time.published".to_string(),
        };
        assert!(err.to_string().contains("time.published"));
    }
}
