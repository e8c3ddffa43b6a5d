//! Error types for cover fetching.

use std::time::Duration;

use bookshelf_http::ResponseError;
use thiserror::Error;

/// The body of a successful response could not be turned into a cover.
#[derive(Debug, Error)]
#[error("Failed to decode cover: {message}")]
pub struct DecodeError {
    pub message: String,
    #[source]
    pub source: Option<serde_json::Error>,
}

impl From<serde_json::Error> for DecodeError {
    fn from(value: serde_json::Error) -> Self {
        Self {
            message: value.to_string(),
            source: Some(value),
        }
    }
}

/// Errors that are fatal to a cover batch.
///
/// A non-success status from a cover locator is not represented here; it
/// cancels the batch and surfaces as an empty result instead.
#[derive(Debug, Error)]
pub enum CoverError {
    #[error("Transport error while fetching {url}")]
    Transport {
        url: String,
        #[source]
        source: ResponseError,
    },

    #[error("Malformed cover returned by {url}")]
    Decode {
        url: String,
        #[source]
        source: DecodeError,
    },

    #[error("Cover batch timed out after {after:?}")]
    TimedOut { after: Duration },

    #[error("Cover fetch task failed")]
    TaskFailed {
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("Invalid cover locator: {message}")]
    InvalidLocator {
        message: String,
        #[source]
        source: Option<url::ParseError>,
    },
}

impl CoverError {
    pub fn is_transport(&self) -> bool {
        matches!(self, CoverError::Transport { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, CoverError::Decode { .. })
    }
}

/// Result type alias for cover operations.
pub type Result<T> = std::result::Result<T, CoverError>;
