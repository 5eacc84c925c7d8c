//! Error types for the monitor.
//!
//! Only [`MonitorError`] ever reaches `main`. [`TranslationError`] is absorbed
//! where translation happens (the source text is used instead), and
//! [`DeliveryError`] is wrapped into [`MonitorError::Delivery`] so that a failed
//! send aborts the run before the last-seen record is touched.

use thiserror::Error;

/// Failures that end a run with a non-zero exit code.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Network-level failure while fetching the news page.
    #[error("network error: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The news page answered with a non-2xx status.
    #[error("HTTP error: {status} for url ({url})")]
    HttpStatus { url: String, status: u16 },

    /// A notification could not be delivered.
    #[error("delivery failed: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration file or value.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for [`MonitorError`].
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Failures reported by a translation backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    #[error("no translation found")]
    NotFound,

    #[error("translation backend rate limited the request")]
    RateLimited,

    #[error("translation request failed: {0}")]
    Request(String),

    #[error("unexpected translation failure: {0}")]
    Unexpected(String),
}

/// Failures reported by the messaging transport.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Telegram API returned {status}: {body}")]
    Api { status: u16, body: String },
}
