//! Chunked batch execution.
//!
//! [`BatchExecutor`] splits a slice into fixed-size chunks and hands each to a
//! processing function. A [`FailureMode`] decides what a failed chunk does to
//! the rest of the batch:
//!
//! - [`FailureMode::Ignore`]: the error is dropped, the next chunk runs
//! - [`FailureMode::AbortAndThrow`]: the error is returned, nothing else runs
//! - [`FailureMode::Retry`]: the chunk is retried under the policy's
//!   [`RetryPolicy`](crate::RetryPolicy); if it still fails the error is
//!   returned and nothing else runs

mod executor;
mod policy;

pub use executor::{BatchExecutor, batch_exec, batch_exec_async};
pub use policy::{BatchPolicy, BatchPolicyBuilder, FailureMode};
