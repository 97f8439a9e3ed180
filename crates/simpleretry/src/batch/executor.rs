//! Chunk-by-chunk processing with per-chunk failure handling.

use super::policy::{BatchPolicy, FailureMode};
use crate::interrupt::{Interrupt, Pause};
use crate::kind::{Classify, ErrorKind};
use crate::retry::RetryExecutor;
use std::future::Future;
use tracing::{debug, warn};

/// Feeds a slice to a chunk processor under a [`BatchPolicy`].
///
/// Chunks are consecutive, non-overlapping windows of `chunk_size` elements
/// in input order; the last one may be shorter. Every chunk is processed,
/// one at a time, with the inter-chunk delay between neighbours and none
/// after the last chunk.
///
/// # Examples
///
/// ```rust
/// use simpleretry::{BatchExecutor, BatchPolicy, FailureMode};
/// use std::io;
///
/// let policy = BatchPolicy::<io::ErrorKind>::builder()
///     .chunk_size(2)
///     .failure_mode(FailureMode::Ignore)
///     .build()
///     .unwrap();
///
/// let mut seen = Vec::new();
/// BatchExecutor::new(&policy)
///     .run(
///         |chunk: &[u32]| {
///             seen.push(chunk.to_vec());
///             Ok::<_, io::Error>(())
///         },
///         &[1, 2, 3, 4, 5],
///     )
///     .unwrap();
///
/// assert_eq!(seen, vec![vec![1, 2], vec![3, 4], vec![5]]);
/// ```
pub struct BatchExecutor<'p, K> {
    policy: &'p BatchPolicy<K>,
    interrupt: Interrupt,
}

impl<'p, K: ErrorKind> BatchExecutor<'p, K> {
    /// Create an executor for `policy`.
    pub fn new(policy: &'p BatchPolicy<K>) -> Self {
        Self {
            policy,
            interrupt: Interrupt::new(),
        }
    }

    /// Use `interrupt` to cut inter-chunk and retry pauses short.
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Process `items` chunk by chunk, blocking during pauses.
    ///
    /// # Returns
    /// - `Ok(())`: every chunk was processed (or its error ignored)
    /// - `Err(E)`: the error that halted the batch, as returned by `process`
    pub fn run<I, E, F>(&self, mut process: F, items: &[I]) -> Result<(), E>
    where
        F: FnMut(&[I]) -> Result<(), E>,
        E: Classify<Kind = K>,
    {
        for (index, chunk) in items.chunks(self.policy.chunk_size()).enumerate() {
            if index > 0 {
                if let Some(delay) = self.policy.inter_chunk_delay() {
                    log_pause(self.interrupt.pause(delay), index);
                }
            }

            debug!(chunk = index, len = chunk.len(), "processing chunk");
            let outcome = match self.policy.retry_policy() {
                Some(retry) => RetryExecutor::new(retry)
                    .with_interrupt(self.interrupt.clone())
                    .execute(|| process(chunk)),
                None => process(chunk),
            };
            self.settle(outcome, index)?;
        }
        Ok(())
    }

    /// Async counterpart of [`BatchExecutor::run`].
    pub async fn run_async<'a, I, E, F, Fut>(&self, mut process: F, items: &'a [I]) -> Result<(), E>
    where
        F: FnMut(&'a [I]) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Classify<Kind = K>,
    {
        for (index, chunk) in items.chunks(self.policy.chunk_size()).enumerate() {
            if index > 0 {
                if let Some(delay) = self.policy.inter_chunk_delay() {
                    log_pause(self.interrupt.pause_async(delay).await, index);
                }
            }

            debug!(chunk = index, len = chunk.len(), "processing chunk");
            let outcome = match self.policy.retry_policy() {
                Some(retry) => {
                    RetryExecutor::new(retry)
                        .with_interrupt(self.interrupt.clone())
                        .execute_async(|| process(chunk))
                        .await
                }
                None => process(chunk).await,
            };
            self.settle(outcome, index)?;
        }
        Ok(())
    }

    fn settle<E>(&self, outcome: Result<(), E>, index: usize) -> Result<(), E>
    where
        E: Classify<Kind = K>,
    {
        let Err(err) = outcome else {
            return Ok(());
        };

        match self.policy.failure_mode() {
            FailureMode::Ignore => {
                warn!(chunk = index, kind = ?err.kind(), "chunk failed, ignoring");
                Ok(())
            }
            FailureMode::AbortAndThrow | FailureMode::Retry => {
                debug!(chunk = index, kind = ?err.kind(), "chunk failed, aborting batch");
                Err(err)
            }
        }
    }
}

fn log_pause(pause: Pause, next_chunk: usize) {
    if pause == Pause::Interrupted {
        debug!(chunk = next_chunk, "inter-chunk delay interrupted");
    }
}

impl<K: ErrorKind> BatchPolicy<K> {
    /// Process `items` under this policy. See [`BatchExecutor::run`].
    pub fn run<I, E, F>(&self, process: F, items: &[I]) -> Result<(), E>
    where
        F: FnMut(&[I]) -> Result<(), E>,
        E: Classify<Kind = K>,
    {
        BatchExecutor::new(self).run(process, items)
    }
}

/// Process `items` in chunks under `policy`, blocking during pauses.
///
/// Shorthand for `BatchExecutor::new(policy).run(process, items)`.
pub fn batch_exec<I, E, F>(process: F, items: &[I], policy: &BatchPolicy<E::Kind>) -> Result<(), E>
where
    F: FnMut(&[I]) -> Result<(), E>,
    E: Classify,
{
    BatchExecutor::new(policy).run(process, items)
}

/// Async counterpart of [`batch_exec`].
pub async fn batch_exec_async<'a, I, E, F, Fut>(
    process: F,
    items: &'a [I],
    policy: &BatchPolicy<E::Kind>,
) -> Result<(), E>
where
    F: FnMut(&'a [I]) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Classify,
{
    BatchExecutor::new(policy).run_async(process, items).await
}
