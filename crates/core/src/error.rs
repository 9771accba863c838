//! Error types for core operations.

use thiserror::Error;

/// Errors raised by the overlap store and engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("{0} must not be empty")]
    EmptyIdentifier(&'static str),

    #[error("need at least 2 scanned tokens to compute overlap, have {tracked}")]
    InsufficientData { tracked: usize },
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
