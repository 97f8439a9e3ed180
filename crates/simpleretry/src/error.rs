//! Configuration error types.
//!
//! Only policy construction can fail inside this crate. Errors raised by the
//! operations being retried are returned to the caller as-is and never pass
//! through [`ConfigError`].

use thiserror::Error;

/// Result type for policy construction.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while building a retry or batch policy.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `max_retries` was negative
    #[error("max_retries must not be negative, got {0}")]
    NegativeMaxRetries(i64),

    /// A delay given in milliseconds was negative
    #[error("delay must not be negative, got {0}ms")]
    NegativeDelay(i64),

    /// A delay given in seconds was negative or not finite
    #[error("delay must be a finite, non-negative number of seconds, got {0}")]
    InvalidDelay(f64),

    /// The attempt-count façade was asked for zero attempts
    #[error("max attempts must be at least one")]
    ZeroMaxAttempts,

    /// `chunk_size` was zero
    #[error("chunk_size must be positive")]
    ZeroChunkSize,

    /// `chunk_size` was negative
    #[error("chunk_size must be positive, got {0}")]
    NegativeChunkSize(i64),

    /// Failure mode `Retry` was selected without a retry policy
    #[error("failure mode `retry` requires a retry policy")]
    MissingRetryPolicy,

    /// Configuration document could not be parsed
    #[error("invalid configuration document: {0}")]
    Json(#[from] serde_json::Error),
}
