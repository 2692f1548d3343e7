//! War service error types.

use thiserror::Error;

/// Errors that can occur while talking to the war service.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Non-success HTTP status.
    #[error("{url} returned HTTP {status}")]
    Upstream {
        /// Requested URL.
        url: String,
        /// Status code received.
        status: u16,
    },

    /// Request timed out.
    #[error("{url} timed out")]
    Timeout {
        /// Requested URL.
        url: String,
    },

    /// Connection or transport failure.
    #[error("request to {url} failed: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Transport error description.
        message: String,
    },

    /// Response body missing required fields or not the expected shape.
    #[error("malformed response from {url}: {reason}")]
    MalformedResponse {
        /// Requested URL.
        url: String,
        /// What was wrong.
        reason: String,
    },
}

impl ApiError {
    /// Network failure, timeout or bad status, as opposed to a bad payload.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        !matches!(self, Self::MalformedResponse { .. })
    }

    pub(crate) fn from_reqwest(url: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { url: url.to_string() }
        } else if let Some(status) = err.status() {
            Self::Upstream {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            Self::MalformedResponse {
                url: url.to_string(),
                reason: err.to_string(),
            }
        } else {
            Self::Network {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }

    pub(crate) fn malformed(url: &str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}
