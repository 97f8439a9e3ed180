//! Serializable policy configuration.
//!
//! Policies hold closures and typed error kinds, so they cannot be
//! deserialized directly. [`RetryConfig`] and [`BatchConfig`] carry the
//! plain-data part (counts, delays, failure mode) and turn into validated
//! builders, to which abort kinds and conditions are then added in code.
//!
//! Signed integers are used on purpose: a negative value in a config file is
//! reported as a [`ConfigError`] instead of failing deserialization.
//!
//! # Examples
//!
//! ```rust
//! use simpleretry::config::RetryConfig;
//! use std::io::ErrorKind;
//!
//! let config = RetryConfig::from_json(r#"{ "max_retries": 3, "delay_ms": 250 }"#).unwrap();
//! let policy = config
//!     .into_builder::<String, ErrorKind>()
//!     .unwrap()
//!     .abort_error_kind(ErrorKind::PermissionDenied)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(policy.max_retries(), Some(3));
//! ```

use crate::batch::{BatchPolicy, BatchPolicyBuilder, FailureMode};
use crate::error::{ConfigError, Result};
use crate::kind::ErrorKind;
use crate::policy::{RetryPolicy, RetryPolicyBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Plain-data form of a [`RetryPolicy`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt; absent means unlimited
    pub max_retries: Option<i64>,

    /// Pause between attempts in milliseconds
    pub delay_ms: i64,
}

impl RetryConfig {
    /// Parse a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate and convert into a policy builder.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NegativeMaxRetries`] or [`ConfigError::NegativeDelay`].
    pub fn into_builder<T, K: ErrorKind>(&self) -> Result<RetryPolicyBuilder<T, K>> {
        let delay = millis(self.delay_ms)?;
        let builder = RetryPolicy::builder().delay(delay);

        match self.max_retries {
            None => Ok(builder),
            Some(max) if max < 0 => Err(ConfigError::NegativeMaxRetries(max)),
            // Beyond u32 the limit is unreachable in practice.
            Some(max) => Ok(builder.max_retries(u32::try_from(max).unwrap_or(u32::MAX))),
        }
    }

    /// Validate and build a policy with no abort kinds or conditions.
    pub fn into_policy<T, K: ErrorKind>(&self) -> Result<RetryPolicy<T, K>> {
        self.into_builder()?.build()
    }
}

/// Plain-data form of a [`BatchPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Elements per chunk
    pub chunk_size: i64,

    /// Pause between chunks in milliseconds
    #[serde(default)]
    pub inter_chunk_delay_ms: Option<i64>,

    /// Chunk failure mode
    #[serde(default = "default_failure_mode")]
    pub failure_mode: FailureMode,

    /// Retry settings for [`FailureMode::Retry`]
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

fn default_failure_mode() -> FailureMode {
    FailureMode::AbortAndThrow
}

impl BatchConfig {
    /// Parse a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate and convert into a policy builder.
    ///
    /// A `retry` section becomes the builder's retry policy, replaceable
    /// through [`BatchPolicyBuilder::retry_policy`] before building.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroChunkSize`], [`ConfigError::NegativeChunkSize`],
    /// [`ConfigError::NegativeDelay`] or any error from the `retry` section.
    pub fn into_builder<K: ErrorKind>(&self) -> Result<BatchPolicyBuilder<K>> {
        let chunk_size = match self.chunk_size {
            0 => return Err(ConfigError::ZeroChunkSize),
            size if size < 0 => return Err(ConfigError::NegativeChunkSize(size)),
            size => usize::try_from(size).unwrap_or(usize::MAX),
        };

        let mut builder = BatchPolicy::builder()
            .chunk_size(chunk_size)
            .failure_mode(self.failure_mode);

        if let Some(delay_ms) = self.inter_chunk_delay_ms {
            builder = builder.inter_chunk_delay(millis(delay_ms)?);
        }
        if let Some(retry) = &self.retry {
            builder = builder.retry_policy(retry.into_policy()?);
        }
        Ok(builder)
    }

    /// Validate and build the policy.
    ///
    /// # Errors
    ///
    /// As [`BatchConfig::into_builder`], plus [`ConfigError::MissingRetryPolicy`]
    /// for `retry` mode without a `retry` section.
    pub fn into_policy<K: ErrorKind>(&self) -> Result<BatchPolicy<K>> {
        self.into_builder()?.build()
    }
}

fn millis(ms: i64) -> Result<Duration> {
    u64::try_from(ms)
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::NegativeDelay(ms))
}
