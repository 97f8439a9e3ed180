//! Example: Chunked batch processing with failure modes
//!
//! This example demonstrates:
//! 1. Splitting a record list into chunks with an inter-chunk delay
//! 2. Each failure mode (ignore, abort-and-throw, retry)
//! 3. Loading a batch policy from a JSON document
//!
//! Run with:
//! ```bash
//! RUST_LOG=simpleretry=debug cargo run -p simpleretry --example batch_example
//! ```

use simpleretry::config::BatchConfig;
use simpleretry::prelude::*;
use std::cell::Cell;
use std::error::Error;
use std::io;
use std::time::Duration;

/// A sink that rejects the write on the listed (1-based) calls
struct FlakySink {
    calls: Cell<usize>,
    failing_calls: Vec<usize>,
}

impl FlakySink {
    fn new(failing_calls: Vec<usize>) -> Self {
        Self {
            calls: Cell::new(0),
            failing_calls,
        }
    }

    fn write(&self, chunk: &[u32]) -> Result<(), io::Error> {
        let call = self.calls.get() + 1;
        self.calls.set(call);

        if self.failing_calls.contains(&call) {
            println!("  Call {}: writing {:?} FAILED", call, chunk);
            Err(io::Error::new(io::ErrorKind::Interrupted, "sink busy"))
        } else {
            println!("  Call {}: wrote {:?}", call, chunk);
            Ok(())
        }
    }
}

fn records() -> Vec<u32> {
    (1..=7).collect()
}

fn run_mode(failure_mode: FailureMode) -> Result<(), Box<dyn Error>> {
    println!("\n=== Failure mode: {:?} ===\n", failure_mode);

    let retry = RetryPolicy::<(), io::ErrorKind>::builder()
        .max_retries(2)
        .delay(Duration::from_millis(20))
        .build()?;

    let policy = BatchPolicy::builder()
        .chunk_size(3)
        .inter_chunk_delay(Duration::from_millis(50))
        .failure_mode(failure_mode)
        .retry_policy(retry)
        .build()?;

    let sink = FlakySink::new(vec![2]);
    let result = batch_exec(|chunk: &[u32]| sink.write(chunk), &records(), &policy);

    match result {
        Ok(()) => println!("\nBatch completed after {} calls", sink.calls.get()),
        Err(err) => println!("\nBatch halted after {} calls: {}", sink.calls.get(), err),
    }

    Ok(())
}

fn run_from_config() -> Result<(), Box<dyn Error>> {
    println!("\n=== Policy loaded from JSON ===\n");

    let config = BatchConfig::from_json(
        r#"{
            "chunk_size": 2,
            "failure_mode": "retry",
            "retry": { "max_retries": 3, "delay_ms": 10 }
        }"#,
    )?;
    let policy = config.into_policy::<io::ErrorKind>()?;
    println!("Loaded: {:?}", policy);

    let sink = FlakySink::new(vec![1, 2]);
    policy.run(|chunk: &[u32]| sink.write(chunk), &records())?;
    println!("\nBatch completed after {} calls", sink.calls.get());

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("==============================================");
    println!("   simpleretry: Batch Execution Examples");
    println!("==============================================");

    run_mode(FailureMode::Ignore)?;
    run_mode(FailureMode::AbortAndThrow)?;
    run_mode(FailureMode::Retry)?;
    run_from_config()?;

    println!("\n==============================================");
    println!("   All examples completed successfully!");
    println!("==============================================\n");

    Ok(())
}
