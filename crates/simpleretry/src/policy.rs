//! Retry policy and its builder.

use crate::error::{ConfigError, Result};
use crate::kind::ErrorKind;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A predicate over an operation's result. Returning `true` accepts the result.
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Declarative description of when and how an operation is retried.
///
/// A policy is immutable once built. It holds no per-execution state, so one
/// policy can drive any number of executions, from any number of threads.
///
/// - `max_retries`: retries allowed after the first attempt. `None` retries
///   without limit until a result is accepted or an abort kind is hit.
/// - `delay`: fixed pause between attempts. Zero by default.
/// - `abort_error_kinds`: errors of these kinds (or more specific ones) are
///   returned at once, never retried.
/// - `abort_conditions`: a result accepted by any of these is returned. With
///   no conditions every result is accepted.
///
/// # Examples
///
/// ```rust
/// use simpleretry::RetryPolicy;
/// use std::io::ErrorKind;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::<Option<u32>, ErrorKind>::builder()
///     .max_retries(3)
///     .delay(Duration::from_millis(100))
///     .abort_error_kind(ErrorKind::PermissionDenied)
///     .abort_condition(|value: &Option<u32>| value.is_some())
///     .build()
///     .unwrap();
///
/// assert_eq!(policy.max_retries(), Some(3));
/// assert!(policy.accepts(&Some(1)));
/// assert!(!policy.accepts(&None));
/// ```
pub struct RetryPolicy<T, K> {
    max_retries: Option<u32>,
    delay: Duration,
    abort_error_kinds: Vec<K>,
    abort_conditions: Vec<Predicate<T>>,
}

impl<T, K: ErrorKind> RetryPolicy<T, K> {
    /// Create a new builder. Nothing is set: unlimited retries, no delay.
    pub fn builder() -> RetryPolicyBuilder<T, K> {
        RetryPolicyBuilder::default()
    }

    /// Policy that runs an operation at most `max_attempts` times in total,
    /// retrying every error and accepting every result.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroMaxAttempts`] if `max_attempts` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use simpleretry::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::<(), std::io::ErrorKind>::with_max_attempts(3, Duration::ZERO)
    ///     .unwrap();
    /// assert_eq!(policy.max_retries(), Some(2));
    /// ```
    pub fn with_max_attempts(max_attempts: u32, delay: Duration) -> Result<Self> {
        if max_attempts == 0 {
            return Err(ConfigError::ZeroMaxAttempts);
        }

        Self::builder()
            .max_retries(max_attempts - 1)
            .delay(delay)
            .build()
    }

    /// Retries allowed after the first attempt, `None` when unlimited.
    pub fn max_retries(&self) -> Option<u32> {
        self.max_retries
    }

    /// Pause between attempts.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Kinds that stop retrying immediately.
    pub fn abort_error_kinds(&self) -> &[K] {
        &self.abort_error_kinds
    }

    /// Number of result-acceptance predicates.
    pub fn abort_condition_count(&self) -> usize {
        self.abort_conditions.len()
    }

    /// Whether `result` ends retrying.
    ///
    /// Predicates are tried in insertion order; the first acceptance wins.
    pub fn accepts(&self, result: &T) -> bool {
        self.abort_conditions.is_empty()
            || self
                .abort_conditions
                .iter()
                .any(|predicate| predicate(result))
    }

    /// Whether an error of `kind` must be returned without retrying.
    pub fn aborts_on(&self, kind: K) -> bool {
        self.abort_error_kinds
            .iter()
            .any(|&listed| kind.is_a(listed))
    }

    /// Whether `retries` unsatisfactory attempts have used up the budget.
    pub(crate) fn budget_exhausted(&self, retries: u32) -> bool {
        self.max_retries.is_some_and(|max| retries > max)
    }
}

impl<T, K: Clone> Clone for RetryPolicy<T, K> {
    fn clone(&self) -> Self {
        Self {
            max_retries: self.max_retries,
            delay: self.delay,
            abort_error_kinds: self.abort_error_kinds.clone(),
            abort_conditions: self.abort_conditions.clone(),
        }
    }
}

impl<T, K: fmt::Debug> fmt::Debug for RetryPolicy<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("delay", &self.delay)
            .field("abort_error_kinds", &self.abort_error_kinds)
            .field("abort_conditions", &self.abort_conditions.len())
            .finish()
    }
}

/// Builder for [`RetryPolicy`].
///
/// Setters are infallible; [`RetryPolicyBuilder::build`] validates.
pub struct RetryPolicyBuilder<T, K> {
    max_retries: Option<u32>,
    delay: Duration,
    delay_secs: Option<f64>,
    abort_error_kinds: Vec<K>,
    abort_conditions: Vec<Predicate<T>>,
}

impl<T, K> Default for RetryPolicyBuilder<T, K> {
    fn default() -> Self {
        Self {
            max_retries: None,
            delay: Duration::ZERO,
            delay_secs: None,
            abort_error_kinds: Vec::new(),
            abort_conditions: Vec::new(),
        }
    }
}

impl<T, K: ErrorKind> RetryPolicyBuilder<T, K> {
    /// Limit retries after the first attempt.
    ///
    /// `max_retries(0)` runs the operation exactly once.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Remove the retry limit.
    pub fn unlimited_retries(mut self) -> Self {
        self.max_retries = None;
        self
    }

    /// Set the pause between attempts.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self.delay_secs = None;
        self
    }

    /// Set the pause between attempts in (fractional) seconds.
    ///
    /// Negative, NaN, infinite or overflowing values fail at
    /// [`RetryPolicyBuilder::build`].
    pub fn delay_secs_f64(mut self, secs: f64) -> Self {
        self.delay_secs = Some(secs);
        self
    }

    /// Never retry errors of `kind` or any more specific kind.
    pub fn abort_error_kind(mut self, kind: K) -> Self {
        if !self.abort_error_kinds.contains(&kind) {
            self.abort_error_kinds.push(kind);
        }
        self
    }

    /// Add several abort kinds at once.
    pub fn abort_error_kinds(self, kinds: impl IntoIterator<Item = K>) -> Self {
        kinds
            .into_iter()
            .fold(self, |builder, kind| builder.abort_error_kind(kind))
    }

    /// Accept (stop retrying on) any result for which `predicate` holds.
    pub fn abort_condition<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.abort_conditions.push(Arc::new(predicate));
        self
    }

    /// Build the policy.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidDelay`] if a delay set through
    /// [`RetryPolicyBuilder::delay_secs_f64`] is not representable.
    pub fn build(self) -> Result<RetryPolicy<T, K>> {
        let delay = match self.delay_secs {
            Some(secs) => {
                Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidDelay(secs))?
            }
            None => self.delay,
        };

        Ok(RetryPolicy {
            max_retries: self.max_retries,
            delay,
            abort_error_kinds: self.abort_error_kinds,
            abort_conditions: self.abort_conditions,
        })
    }
}
