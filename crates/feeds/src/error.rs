//! Error types for provider operations.

use smartmoney_core::CoreError;
use thiserror::Error;

/// Errors that can occur while talking to the data providers.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("{provider} request failed: {message}")]
    ConnectionFailed {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} returned HTTP {status}: {body}")]
    HttpStatus {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("Failed to parse {provider} response: {message}")]
    ParseError {
        provider: &'static str,
        message: String,
    },

    #[error("Token data not found: {0}")]
    TokenNotFound(String),

    #[error("{0} rate limit exceeded")]
    RateLimitExceeded(&'static str),

    #[error("{0} rejected the API key")]
    AuthenticationFailed(&'static str),

    #[error("{0} request timed out")]
    Timeout(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<CoreError> for FeedError {
    fn from(err: CoreError) -> Self {
        FeedError::InvalidInput(err.to_string())
    }
}

impl From<url::ParseError> for FeedError {
    fn from(err: url::ParseError) -> Self {
        FeedError::InvalidInput(format!("invalid URL: {}", err))
    }
}

impl FeedError {
    /// Map a transport-level reqwest failure for `provider`.
    pub fn from_reqwest(provider: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeedError::Timeout(provider)
        } else if err.is_decode() {
            FeedError::ParseError {
                provider,
                message: err.to_string(),
            }
        } else {
            FeedError::ConnectionFailed {
                provider,
                message: err.to_string(),
            }
        }
    }

    /// Map a non-success HTTP status for `provider`.
    pub fn from_status(provider: &'static str, status: u16, body: String) -> Self {
        match status {
            401 | 403 => FeedError::AuthenticationFailed(provider),
            429 => FeedError::RateLimitExceeded(provider),
            _ => FeedError::HttpStatus {
                provider,
                status,
                body,
            },
        }
    }
}

/// Result type for provider operations.
pub type FeedResult<T> = Result<T, FeedError>;
