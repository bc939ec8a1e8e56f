//! Errors raised by the scraper crate.
//!
//! Field-level extraction problems never surface here; they become `None`
//! or empty values on the record. These variants cover whole-call failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("requested listing {requested} but the store returned {received}")]
    IdentifierMismatch { requested: String, received: String },

    #[error("format \"{format}\" is not supported for field {field}")]
    UnsupportedFormat { field: String, format: String },

    #[error("no app named \"{name}\" in the app list")]
    NameNotFound { name: String },

    #[error("invalid store base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
