#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Policy-driven retry execution and chunked batch processing.
//!
//! This crate re-runs fallible operations according to a declarative
//! [`RetryPolicy`]:
//!
//! - **Error-triggered retries**: any error not listed as an abort kind
//!   is retried until the budget runs out, then the last error is returned
//! - **Result-triggered retries**: a value rejected by every abort condition
//!   is retried; once the budget runs out the last value is returned
//! - **Hierarchical abort kinds** via the [`ErrorKind`](kind::ErrorKind) trait
//! - **Fixed delay** between attempts, interruptible through
//!   [`Interrupt`](interrupt::Interrupt)
//! - **Chunked batches** via [`BatchExecutor`] with ignore / abort / retry
//!   failure modes
//!
//! Execution is sequential. Both a blocking API (`execute`, `run`) and an
//! async one (`execute_async`, `run_async`) are provided.
//!
//! # Examples
//!
//! Using the prelude for convenient imports:
//!
//! ```rust
//! use simpleretry::prelude::*;
//! use std::io;
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let policy = RetryPolicy::<u32, io::ErrorKind>::builder()
//!     .max_retries(3)
//!     .delay(Duration::from_millis(10))
//!     .abort_error_kind(io::ErrorKind::PermissionDenied)
//!     .build()?;
//!
//! let value = policy.execute(|| Ok::<_, io::Error>(42))?;
//! assert_eq!(value, 42);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod interrupt;
pub mod kind;
pub mod policy;
pub mod retry;

pub use batch::{BatchExecutor, BatchPolicy, BatchPolicyBuilder, FailureMode, batch_exec};
pub use error::{ConfigError, Result};
pub use policy::{RetryPolicy, RetryPolicyBuilder};
pub use retry::{RetryExecutor, execute_with_retry};

/// Convenient re-exports of commonly used items.
///
/// Import all core abstractions with:
///
/// ```rust
/// use simpleretry::prelude::*;
/// ```
pub mod prelude {
    pub use crate::batch::{BatchExecutor, BatchPolicy, FailureMode, batch_exec, batch_exec_async};
    pub use crate::config::{BatchConfig, RetryConfig};
    pub use crate::error::ConfigError;
    pub use crate::interrupt::Interrupt;
    pub use crate::kind::{Classify, ErrorKind};
    pub use crate::policy::RetryPolicy;
    pub use crate::retry::{RetryExecutor, execute_with_retry, execute_with_retry_async};
}
