//! Error types for the reinfolib client.
//!
//! # Design
//! One flat enum covers every failure the client can surface. The HTTP status
//! decides the variant only at the transport boundary (`check_status`): 401
//! and 400 get dedicated variants because the caller must change the key or
//! the input before trying again. Everything else the server or the network
//! can do wrong lands in one of the three generic API variants, which
//! `kind()` folds back into a single `ErrorKind::Api`.

use thiserror::Error;

/// Errors returned by `SearchCondition` construction and `ReinfoClient` calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The search condition or client configuration is invalid.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The server returned 401.
    #[error("authentication failed, check your API key")]
    Auth,

    /// The server returned 400.
    #[error("invalid request parameters: {reason}")]
    Request { reason: String },

    /// The server returned a non-2xx status other than 400 or 401.
    #[error("API error occurred (status {status}): {reason}")]
    Status { status: u16, reason: String },

    /// No HTTP response was obtained.
    #[error("failed to connect to API: {0}")]
    Connection(String),

    /// The response body was not valid gzip, UTF-8 or JSON.
    #[error("failed to parse API response: {0}")]
    Parse(String),
}

/// Coarse classification of an `ApiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Auth,
    Request,
    Api,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Configuration(_) => ErrorKind::Configuration,
            ApiError::Auth => ErrorKind::Auth,
            ApiError::Request { .. } => ErrorKind::Request,
            ApiError::Status { .. } | ApiError::Connection(_) | ApiError::Parse(_) => ErrorKind::Api,
        }
    }

    /// Only generic API failures may succeed on a plain retry. The client
    /// itself never retries.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Api
    }
}
