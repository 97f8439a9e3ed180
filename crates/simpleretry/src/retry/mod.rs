//! Retry execution.
//!
//! [`RetryExecutor`] drives an operation under a
//! [`RetryPolicy`](crate::RetryPolicy). Two triggers cause a retry: the
//! operation fails with an error that is not an abort kind, or it returns a
//! value none of the policy's abort conditions accept. Delay between attempts
//! is fixed.
//!
//! # Examples
//!
//! ```rust
//! use simpleretry::retry::execute_with_retry;
//! use simpleretry::RetryPolicy;
//! use std::io;
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::<Vec<u8>, io::ErrorKind>::builder()
//!     .max_retries(2)
//!     .delay(Duration::from_millis(1))
//!     .abort_error_kind(io::ErrorKind::NotFound)
//!     .abort_condition(|bytes: &Vec<u8>| !bytes.is_empty())
//!     .build()
//!     .unwrap();
//!
//! let result = execute_with_retry(|| Ok::<_, io::Error>(vec![1, 2, 3]), &policy);
//! assert_eq!(result.unwrap(), vec![1, 2, 3]);
//! ```

mod executor;

pub use executor::{RetryExecutor, execute_with_retry, execute_with_retry_async};
