use thiserror::Error;

/// Fatal errors of a scrape run.
///
/// None of these are retried: a failed request aborts the run, and pages
/// persisted before the failure stay persisted.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to persist incidents: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}
