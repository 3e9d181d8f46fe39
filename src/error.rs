use std::path::PathBuf;
use std::result;

use thiserror::Error;

/// Error types for E-utilities pipeline operations
#[derive(Error, Debug)]
pub enum PubMedError {
    /// Connection failure, timeout, or a non-2xx HTTP status
    #[error("Transport error: {message}")]
    TransportError {
        /// HTTP status code when a response was received
        status: Option<u16>,
        message: String,
    },

    /// Body was received but is not the XML document we expected
    #[error("Malformed response: {message}")]
    MalformedResponseError { message: String },

    /// Cache file could not be written
    #[error("Unable to write cache file '{}': {message}", path.display())]
    CacheWriteError { path: PathBuf, message: String },

    /// Cache file could not be read or decoded.
    ///
    /// The pipeline degrades this to a cache miss and never returns it.
    #[error("Unable to read cache file '{}': {message}", path.display())]
    CacheReadError { path: PathBuf, message: String },

    /// Search term rejected before any request was made
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Invalid PMID format
    #[error("Invalid PMID format: {pmid}")]
    InvalidPmid { pmid: String },

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = result::Result<T, PubMedError>;

impl From<reqwest::Error> for PubMedError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest's top-level message hides the cause ("error sending request")
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = std::error::Error::source(cause);
        }

        PubMedError::TransportError {
            status: err.status().map(|s| s.as_u16()),
            message,
        }
    }
}

impl PubMedError {
    /// Stable, machine-readable name of the error kind.
    ///
    /// Together with the `Display` message this is what a response adapter
    /// reports to its own callers.
    pub fn kind(&self) -> &'static str {
        match self {
            PubMedError::TransportError { .. } => "transport_error",
            PubMedError::MalformedResponseError { .. } => "malformed_response_error",
            PubMedError::CacheWriteError { .. } => "cache_write_error",
            PubMedError::CacheReadError { .. } => "cache_read_error",
            PubMedError::InvalidQuery(_) => "invalid_query",
            PubMedError::InvalidPmid { .. } => "invalid_pmid",
            PubMedError::InvalidConfig(_) => "invalid_config",
        }
    }

    /// Whether an outer retry policy may reasonably try again.
    ///
    /// The pipeline itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            PubMedError::TransportError { status, message } => match status {
                Some(code) => (500..600).contains(code) || *code == 429,
                None => {
                    let lower_msg = message.to_lowercase();
                    lower_msg.contains("timed out")
                        || lower_msg.contains("timeout")
                        || lower_msg.contains("connect")
                }
            },
            PubMedError::MalformedResponseError { .. }
            | PubMedError::CacheWriteError { .. }
            | PubMedError::CacheReadError { .. }
            | PubMedError::InvalidQuery(_)
            | PubMedError::InvalidPmid { .. }
            | PubMedError::InvalidConfig(_) => false,
        }
    }
}
