//! Example: Retrying operations under a RetryPolicy
//!
//! This example demonstrates:
//! 1. Error-triggered retries with a fixed delay
//! 2. Abort error kinds (never retried)
//! 3. Result-triggered retries with abort conditions
//! 4. The async executor and interrupting a long delay
//!
//! Run with:
//! ```bash
//! RUST_LOG=simpleretry=debug cargo run -p simpleretry --example retry_example
//! ```

use simpleretry::prelude::*;
use std::cell::Cell;
use std::error::Error;
use std::io;
use std::time::{Duration, Instant};

/// A simulated service that fails the first few times
struct UnreliableService {
    attempts: Cell<u32>,
    fail_count: u32,
    failure: io::ErrorKind,
}

impl UnreliableService {
    fn new(fail_count: u32, failure: io::ErrorKind) -> Self {
        Self {
            attempts: Cell::new(0),
            fail_count,
            failure,
        }
    }

    fn call(&self) -> Result<String, io::Error> {
        let attempt = self.attempts.get() + 1;
        self.attempts.set(attempt);

        if attempt <= self.fail_count {
            println!("  Attempt {}: FAILED ({:?})", attempt, self.failure);
            Err(io::Error::new(
                self.failure,
                format!("transient error on attempt {}", attempt),
            ))
        } else {
            println!("  Attempt {}: SUCCESS", attempt);
            Ok("service response".to_string())
        }
    }

    fn total_attempts(&self) -> u32 {
        self.attempts.get()
    }
}

/// Example 1: Fixed-delay retry on errors
fn example_simple_retry() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 1: Simple Retry with Fixed Delay ===\n");

    let policy = RetryPolicy::<String, io::ErrorKind>::builder()
        .max_retries(3)
        .delay(Duration::from_millis(100))
        .build()?;

    let service = UnreliableService::new(2, io::ErrorKind::TimedOut);

    println!("Calling unreliable service (will fail 2 times before succeeding)...");
    let start = Instant::now();
    let result = policy.execute(|| service.call())?;

    println!("\nResult: {}", result);
    println!("Total attempts: {}", service.total_attempts());
    println!("Total time: {:?}", start.elapsed());
    println!("Expected delays: 2 x 100ms = ~200ms");

    Ok(())
}

/// Example 2: Abort error kinds
fn example_abort_kinds() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 2: Abort Error Kinds ===\n");

    let policy = RetryPolicy::<String, io::ErrorKind>::builder()
        .max_retries(5)
        .delay(Duration::from_millis(10))
        .abort_error_kind(io::ErrorKind::PermissionDenied)
        .build()?;

    println!("Permission error (should NOT retry)");
    let service = UnreliableService::new(10, io::ErrorKind::PermissionDenied);
    let result = policy.execute(|| service.call());
    assert!(result.is_err());
    println!("Total attempts: {}", service.total_attempts());

    println!("\nConnection reset (should retry)");
    let service = UnreliableService::new(2, io::ErrorKind::ConnectionReset);
    let result = policy.execute(|| service.call());
    assert!(result.is_ok());
    println!("Total attempts: {}", service.total_attempts());

    Ok(())
}

/// Example 3: Retrying on unsatisfactory results
fn example_abort_conditions() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 3: Abort Conditions on Results ===\n");

    let policy = RetryPolicy::<Option<u32>, io::ErrorKind>::builder()
        .max_retries(4)
        .abort_condition(Option::is_some)
        .build()?;

    let polls = Cell::new(0);
    let result = policy.execute(|| {
        polls.set(polls.get() + 1);
        let ready = (polls.get() >= 3).then_some(polls.get());
        println!("  Poll {}: {:?}", polls.get(), ready);
        Ok::<_, io::Error>(ready)
    })?;

    println!("\nResult: {:?} after {} polls", result, polls.get());

    let never_ready = RetryPolicy::<Option<u32>, io::ErrorKind>::builder()
        .max_retries(2)
        .abort_condition(Option::is_some)
        .build()?;
    let result = never_ready.execute(|| Ok::<_, io::Error>(None))?;
    println!("Budget exhausted, last result returned: {:?}", result);

    Ok(())
}

/// Example 4: Async execution with an interrupted delay
async fn example_async_interrupt() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 4: Async Retry with Interrupt ===\n");

    let policy = RetryPolicy::<&str, io::ErrorKind>::builder()
        .max_retries(1)
        .delay(Duration::from_secs(3600))
        .build()?;

    let interrupt = Interrupt::new();
    let remote = interrupt.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        println!("  Interrupting the one-hour delay");
        remote.interrupt();
    });

    let attempts = Cell::new(0);
    let start = Instant::now();
    let result = RetryExecutor::new(&policy)
        .with_interrupt(interrupt)
        .execute_async(|| {
            attempts.set(attempts.get() + 1);
            let attempt = attempts.get();
            async move {
                if attempt == 1 {
                    Err(io::Error::other("first attempt fails"))
                } else {
                    Ok("recovered")
                }
            }
        })
        .await?;

    println!("\nResult: {} in {:?}", result, start.elapsed());

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("==============================================");
    println!("   simpleretry: Retry Policy Examples");
    println!("==============================================");

    example_simple_retry()?;
    example_abort_kinds()?;
    example_abort_conditions()?;
    example_async_interrupt().await?;

    println!("\n==============================================");
    println!("   All examples completed successfully!");
    println!("==============================================\n");

    Ok(())
}
