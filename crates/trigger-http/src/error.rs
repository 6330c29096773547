//! Error types for trigger-http

use thiserror::Error;
use trigger_core::{PublishError, TrackerError};

/// Errors raised by the HTTP adapters.
#[derive(Error, Debug)]
pub enum HttpError {
    /// Building the HTTP client failed
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// Invalid base or endpoint URL
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Request could not be sent or the response not read
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// Remote answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not have the expected shape
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            HttpError::Decode(err.to_string())
        } else {
            HttpError::Transport(err.to_string())
        }
    }
}

impl From<HttpError> for TrackerError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Status { status, body } => TrackerError::Status { status, body },
            HttpError::Decode(msg) => TrackerError::Decode(msg),
            other => TrackerError::Transport(other.to_string()),
        }
    }
}

impl From<HttpError> for PublishError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Status { status, body } => PublishError::Rejected { status, body },
            other => PublishError::Transport(other.to_string()),
        }
    }
}
