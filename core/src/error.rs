//! Error types for the API client.
//!
//! # Design
//! Every failure a caller can observe is one of four variants. Transport
//! library errors never cross this boundary; they are classified by
//! `normalize` first. Callers decide whether to retry by asking
//! `is_retryable`, which is true only for network-level failures.

use thiserror::Error;

/// Result alias used throughout the client.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Network-level failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The request did not complete within the configured timeout.
    Timeout,
    /// The connection could not be established.
    Connect,
    /// Any other I/O or protocol failure (for example a truncated body).
    Other,
}

impl std::fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Other => "io",
        };
        f.write_str(name)
    }
}

/// Errors returned by every client operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid client setup (API key, base URL, timeout).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A request input failed validation, or a response payload was malformed.
    #[error("validation error: {0}")]
    Validation(String),

    /// The request never produced an HTTP response.
    #[error("transport error ({kind}): {message}")]
    Transport {
        kind: TransportErrorKind,
        message: String,
    },

    /// The server answered with a status the operation does not accept.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
}

impl ApiError {
    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        ApiError::Configuration(msg.into())
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    /// HTTP status code, for `HttpStatus` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body, for `HttpStatus` errors.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::HttpStatus { body, .. } => Some(body),
            _ => None,
        }
    }

    /// True when the server reported that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// True only for network-level failures. A repeated request can succeed
    /// where validation and configuration errors never will.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            ApiError::Transport {
                kind: TransportErrorKind::Timeout,
                ..
            }
        )
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}
