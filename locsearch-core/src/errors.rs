//! Error types for location search requests.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while querying the location search endpoint.
#[derive(Debug, Error)]
pub enum LocationSearchError {
    /// Request never produced an HTTP response.
    #[error("Transport error: {reason}")]
    Transport {
        /// The reason for the transport failure
        reason: String,
    },

    /// Server answered with a non-success status code.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// Status code returned by the server
        status: StatusCode,
        /// URL that was requested
        url: String,
    },

    /// Response body was not a JSON array of records.
    #[error("Deserialization error: {reason}")]
    Deserialization {
        /// The reason the body could not be decoded
        reason: String,
    },

    /// Base URL or derived endpoint URL is malformed.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL text
        url: String,
        /// The reason the URL was rejected
        reason: String,
    },
}

impl LocationSearchError {
    /// Returns the HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            LocationSearchError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Checks if this error stems from caller-supplied configuration.
    pub fn is_user_error(&self) -> bool {
        matches!(self, LocationSearchError::InvalidUrl { .. })
    }
}

impl From<reqwest::Error> for LocationSearchError {
    fn from(error: reqwest::Error) -> Self {
        LocationSearchError::Transport {
            reason: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for LocationSearchError {
    fn from(error: serde_json::Error) -> Self {
        LocationSearchError::Deserialization {
            reason: error.to_string(),
        }
    }
}
