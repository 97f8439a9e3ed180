//! The attempt / evaluate / pause / retry loop.

use crate::interrupt::{Interrupt, Pause};
use crate::kind::{Classify, ErrorKind};
use crate::policy::RetryPolicy;
use std::future::Future;
use std::ops::ControlFlow;
use tracing::{debug, trace};

/// Runs operations under a [`RetryPolicy`].
///
/// Each call to [`RetryExecutor::execute`] starts a fresh retry budget; the
/// executor itself carries nothing between calls except its [`Interrupt`].
///
/// # Decision order
///
/// After every attempt:
///
/// 1. `Ok(value)` accepted by the policy (or no conditions set): return it.
/// 2. `Err(err)` whose kind is an abort kind: return it, even when the
///    budget is already spent.
/// 3. Otherwise count one retry. Past `max_retries` the last outcome is
///    returned as-is: the error for a failure, the value for a rejected
///    result.
/// 4. Pause for the policy delay and try again.
///
/// # Examples
///
/// ```rust
/// use simpleretry::{RetryExecutor, RetryPolicy};
/// use std::io;
///
/// let policy = RetryPolicy::<u32, io::ErrorKind>::builder()
///     .max_retries(3)
///     .build()
///     .unwrap();
///
/// let mut calls = 0;
/// let result = RetryExecutor::new(&policy).execute(|| {
///     calls += 1;
///     if calls < 3 {
///         Err(io::Error::other("transient"))
///     } else {
///         Ok(calls)
///     }
/// });
///
/// assert_eq!(result.unwrap(), 3);
/// ```
pub struct RetryExecutor<'p, T, K> {
    policy: &'p RetryPolicy<T, K>,
    interrupt: Interrupt,
}

impl<'p, T, K: ErrorKind> RetryExecutor<'p, T, K> {
    /// Create an executor for `policy` with its own, never signalled interrupt.
    pub fn new(policy: &'p RetryPolicy<T, K>) -> Self {
        Self {
            policy,
            interrupt: Interrupt::new(),
        }
    }

    /// Use `interrupt` to cut pauses between attempts short.
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// The policy this executor applies.
    pub fn policy(&self) -> &'p RetryPolicy<T, K> {
        self.policy
    }

    /// Run `operation` until the policy stops it, blocking between attempts.
    ///
    /// # Returns
    /// - `Ok(T)`: an accepted result, or the last result once the budget ran
    ///   out with results still being rejected
    /// - `Err(E)`: an abort-kind error, or the last error once the budget ran
    ///   out
    pub fn execute<F, E>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        E: Classify<Kind = K>,
    {
        let mut retries = 0;
        loop {
            match self.evaluate(operation(), &mut retries) {
                ControlFlow::Break(outcome) => return outcome,
                ControlFlow::Continue(()) => {
                    log_pause(self.interrupt.pause(self.policy.delay()), retries);
                }
            }
        }
    }

    /// Async counterpart of [`RetryExecutor::execute`].
    ///
    /// Attempts still run one at a time; the pause uses `tokio::time::sleep`.
    pub async fn execute_async<F, Fut, E>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify<Kind = K>,
    {
        let mut retries = 0;
        loop {
            match self.evaluate(operation().await, &mut retries) {
                ControlFlow::Break(outcome) => return outcome,
                ControlFlow::Continue(()) => {
                    log_pause(self.interrupt.pause_async(self.policy.delay()).await, retries);
                }
            }
        }
    }

    fn evaluate<E>(&self, outcome: Result<T, E>, retries: &mut u32) -> ControlFlow<Result<T, E>>
    where
        E: Classify<Kind = K>,
    {
        match outcome {
            Ok(value) => {
                if self.policy.accepts(&value) {
                    trace!(retries = *retries, "result accepted");
                    return ControlFlow::Break(Ok(value));
                }

                *retries = retries.saturating_add(1);
                if self.policy.budget_exhausted(*retries) {
                    debug!(
                        retries = *retries - 1,
                        "retry budget exhausted, returning last rejected result"
                    );
                    return ControlFlow::Break(Ok(value));
                }

                debug!(
                    attempt = *retries,
                    max_retries = ?self.policy.max_retries(),
                    "result rejected, retrying"
                );
                ControlFlow::Continue(())
            }
            Err(err) => {
                let kind = err.kind();
                if self.policy.aborts_on(kind) {
                    debug!(?kind, "abort error kind, not retrying");
                    return ControlFlow::Break(Err(err));
                }

                *retries = retries.saturating_add(1);
                if self.policy.budget_exhausted(*retries) {
                    debug!(
                        ?kind,
                        retries = *retries - 1,
                        "retry budget exhausted, returning last error"
                    );
                    return ControlFlow::Break(Err(err));
                }

                debug!(
                    ?kind,
                    attempt = *retries,
                    max_retries = ?self.policy.max_retries(),
                    "operation failed, retrying"
                );
                ControlFlow::Continue(())
            }
        }
    }
}

fn log_pause(pause: Pause, attempt: u32) {
    if pause == Pause::Interrupted {
        debug!(attempt, "retry delay interrupted, retrying now");
    }
}

impl<T, K: ErrorKind> RetryPolicy<T, K> {
    /// Run `operation` under this policy. See [`RetryExecutor::execute`].
    pub fn execute<F, E>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        E: Classify<Kind = K>,
    {
        RetryExecutor::new(self).execute(operation)
    }

    /// Run `operation` under this policy. See [`RetryExecutor::execute_async`].
    pub async fn execute_async<F, Fut, E>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify<Kind = K>,
    {
        RetryExecutor::new(self).execute_async(operation).await
    }
}

/// Run `operation` under `policy`, blocking between attempts.
///
/// Shorthand for `RetryExecutor::new(policy).execute(operation)`.
pub fn execute_with_retry<T, E, F>(operation: F, policy: &RetryPolicy<T, E::Kind>) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: Classify,
{
    RetryExecutor::new(policy).execute(operation)
}

/// Async counterpart of [`execute_with_retry`].
pub async fn execute_with_retry_async<T, E, F, Fut>(
    operation: F,
    policy: &RetryPolicy<T, E::Kind>,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Classify,
{
    RetryExecutor::new(policy).execute_async(operation).await
}
