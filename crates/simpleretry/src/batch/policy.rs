//! Batch execution policy.

use crate::error::{ConfigError, Result};
use crate::kind::ErrorKind;
use crate::policy::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What to do when processing a chunk fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Drop the error and carry on with the next chunk
    Ignore,
    /// Return the error and skip every remaining chunk
    AbortAndThrow,
    /// Retry the chunk under a [`RetryPolicy`]; an error that survives
    /// retrying behaves like `AbortAndThrow`
    Retry,
}

#[derive(Clone)]
enum Handling<K> {
    Ignore,
    AbortAndThrow,
    Retry(RetryPolicy<(), K>),
}

/// How a sequence is split into chunks and how chunk failures are handled.
///
/// Built through [`BatchPolicy::builder`], which rejects a zero chunk size
/// and a `Retry` failure mode without a retry policy.
///
/// # Examples
///
/// ```rust
/// use simpleretry::{BatchPolicy, FailureMode, RetryPolicy};
/// use std::time::Duration;
///
/// let retry = RetryPolicy::<(), std::io::ErrorKind>::builder()
///     .max_retries(3)
///     .build()
///     .unwrap();
///
/// let policy = BatchPolicy::builder()
///     .chunk_size(100)
///     .inter_chunk_delay(Duration::from_millis(50))
///     .failure_mode(FailureMode::Retry)
///     .retry_policy(retry)
///     .build()
///     .unwrap();
///
/// assert_eq!(policy.chunk_size(), 100);
/// assert!(policy.retry_policy().is_some());
/// ```
#[derive(Clone)]
pub struct BatchPolicy<K> {
    chunk_size: usize,
    inter_chunk_delay: Option<Duration>,
    handling: Handling<K>,
}

impl<K: ErrorKind> BatchPolicy<K> {
    /// Create a new builder.
    pub fn builder() -> BatchPolicyBuilder<K> {
        BatchPolicyBuilder::default()
    }

    /// Elements per chunk. Always positive.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Pause between consecutive chunks.
    pub fn inter_chunk_delay(&self) -> Option<Duration> {
        self.inter_chunk_delay
    }

    /// The chunk failure mode.
    pub fn failure_mode(&self) -> FailureMode {
        match self.handling {
            Handling::Ignore => FailureMode::Ignore,
            Handling::AbortAndThrow => FailureMode::AbortAndThrow,
            Handling::Retry(_) => FailureMode::Retry,
        }
    }

    /// The retry policy applied to chunks, present only in `Retry` mode.
    pub fn retry_policy(&self) -> Option<&RetryPolicy<(), K>> {
        match &self.handling {
            Handling::Retry(policy) => Some(policy),
            _ => None,
        }
    }
}

impl<K: std::fmt::Debug> std::fmt::Debug for BatchPolicy<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("BatchPolicy");
        s.field("chunk_size", &self.chunk_size)
            .field("inter_chunk_delay", &self.inter_chunk_delay);
        match &self.handling {
            Handling::Ignore => s.field("failure_mode", &FailureMode::Ignore),
            Handling::AbortAndThrow => s.field("failure_mode", &FailureMode::AbortAndThrow),
            Handling::Retry(policy) => s
                .field("failure_mode", &FailureMode::Retry)
                .field("retry_policy", policy),
        };
        s.finish()
    }
}

/// Builder for [`BatchPolicy`].
///
/// The failure mode defaults to [`FailureMode::AbortAndThrow`].
pub struct BatchPolicyBuilder<K> {
    chunk_size: usize,
    inter_chunk_delay: Option<Duration>,
    failure_mode: FailureMode,
    retry_policy: Option<RetryPolicy<(), K>>,
}

impl<K> Default for BatchPolicyBuilder<K> {
    fn default() -> Self {
        Self {
            chunk_size: 0,
            inter_chunk_delay: None,
            failure_mode: FailureMode::AbortAndThrow,
            retry_policy: None,
        }
    }
}

impl<K: ErrorKind> BatchPolicyBuilder<K> {
    /// Set the number of elements per chunk. Must be positive.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Pause for `delay` between consecutive chunks.
    pub fn inter_chunk_delay(mut self, delay: Duration) -> Self {
        self.inter_chunk_delay = Some(delay);
        self
    }

    /// Set the chunk failure mode.
    pub fn failure_mode(mut self, failure_mode: FailureMode) -> Self {
        self.failure_mode = failure_mode;
        self
    }

    /// Set the retry policy used in [`FailureMode::Retry`].
    ///
    /// Ignored by the other failure modes.
    pub fn retry_policy(mut self, retry_policy: RetryPolicy<(), K>) -> Self {
        self.retry_policy = Some(retry_policy);
        self
    }

    /// Build the policy.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ZeroChunkSize`] if no positive chunk size was set
    /// - [`ConfigError::MissingRetryPolicy`] for `Retry` without a retry policy
    pub fn build(self) -> Result<BatchPolicy<K>> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }

        let handling = match self.failure_mode {
            FailureMode::Ignore => Handling::Ignore,
            FailureMode::AbortAndThrow => Handling::AbortAndThrow,
            FailureMode::Retry => {
                Handling::Retry(self.retry_policy.ok_or(ConfigError::MissingRetryPolicy)?)
            }
        };

        Ok(BatchPolicy {
            chunk_size: self.chunk_size,
            inter_chunk_delay: self.inter_chunk_delay,
            handling,
        })
    }
}
