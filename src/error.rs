//! Error types for the open directory catalog.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the open directory catalog.
#[derive(Error, Debug)]
pub enum Error {
    // Crawl errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to fetch {url}: {reason}")]
    FetchError { url: String, reason: String },

    // Parse errors
    #[error("Failed to parse filename: {0}")]
    ParseError(String),

    // Picker errors
    #[error("Selection cancelled")]
    SelectionCancelled,

    // Config errors
    #[error("Invalid config file: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Create a fetch error for the given URL.
    pub fn fetch<U: ToString, R: ToString>(url: U, reason: R) -> Self {
        Error::FetchError {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
