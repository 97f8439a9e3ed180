//! Batch executor scenarios
//!
//! Covers chunk boundaries for several input lengths and the behaviour of
//! each failure mode when a chunk fails.

mod common;

use common::{AppError, AppKind};
use rstest::*;
use simpleretry::batch::batch_exec_async;
use simpleretry::{BatchPolicy, FailureMode, RetryPolicy, batch_exec};
use std::cell::RefCell;
use std::time::Duration;

#[fixture]
fn items() -> Vec<u32> {
    vec![1, 2, 3, 4]
}

fn batch_policy(chunk_size: usize, failure_mode: FailureMode) -> BatchPolicy<AppKind> {
    BatchPolicy::builder()
        .chunk_size(chunk_size)
        .failure_mode(failure_mode)
        .retry_policy(
            RetryPolicy::builder()
                .max_retries(3)
                .abort_error_kind(AppKind::Validation)
                .delay(Duration::from_millis(1))
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}

/// Records every chunk handed to it; fails on the attempts listed in
/// `failing_calls` (1-based).
struct Recorder {
    failing_calls: Vec<usize>,
    kind: AppKind,
    calls: RefCell<Vec<Vec<u32>>>,
    completed: RefCell<Vec<Vec<u32>>>,
}

impl Recorder {
    fn new(failing_calls: Vec<usize>) -> Self {
        Self::failing_with(failing_calls, AppKind::Network)
    }

    fn failing_with(failing_calls: Vec<usize>, kind: AppKind) -> Self {
        Self {
            failing_calls,
            kind,
            calls: RefCell::new(Vec::new()),
            completed: RefCell::new(Vec::new()),
        }
    }

    fn process(&self, chunk: &[u32]) -> Result<(), AppError> {
        let attempt = {
            let mut calls = self.calls.borrow_mut();
            calls.push(chunk.to_vec());
            calls.len()
        };
        if self.failing_calls.contains(&attempt) {
            return Err(AppError {
                kind: self.kind,
                attempt,
            });
        }
        self.completed.borrow_mut().push(chunk.to_vec());
        Ok(())
    }

    fn calls(&self) -> Vec<Vec<u32>> {
        self.calls.borrow().clone()
    }

    fn completed(&self) -> Vec<Vec<u32>> {
        self.completed.borrow().clone()
    }
}

#[rstest]
#[case(4, 2, vec![2, 2])]
#[case(5, 2, vec![2, 2, 1])]
#[case(1, 3, vec![1])]
#[case(3, 3, vec![3])]
#[case(7, 1, vec![1; 7])]
#[case(0, 4, vec![])]
fn test_chunk_boundaries(#[case] len: u32, #[case] chunk_size: usize, #[case] sizes: Vec<usize>) {
    let items: Vec<u32> = (1..=len).collect();
    let recorder = Recorder::new(vec![]);

    batch_exec(
        |chunk: &[u32]| recorder.process(chunk),
        &items,
        &batch_policy(chunk_size, FailureMode::AbortAndThrow),
    )
    .unwrap();

    let calls = recorder.calls();
    assert_eq!(calls.iter().map(Vec::len).collect::<Vec<_>>(), sizes);
    assert_eq!(calls.concat(), items, "chunks must cover the input in order");
}

#[rstest]
fn test_two_by_two_chunks(items: Vec<u32>) {
    let recorder = Recorder::new(vec![]);

    batch_exec(
        |chunk: &[u32]| recorder.process(chunk),
        &items,
        &batch_policy(2, FailureMode::Ignore),
    )
    .unwrap();

    assert_eq!(recorder.calls(), vec![vec![1, 2], vec![3, 4]]);
}

#[rstest]
fn test_ignore_swallows_chunk_error(items: Vec<u32>) {
    let recorder = Recorder::new(vec![1]);

    let result = batch_exec(
        |chunk: &[u32]| recorder.process(chunk),
        &items,
        &batch_policy(2, FailureMode::Ignore),
    );

    assert!(result.is_ok());
    assert_eq!(recorder.calls().len(), 2);
    assert_eq!(recorder.completed(), vec![vec![3, 4]]);
}

#[rstest]
fn test_ignore_never_retries(items: Vec<u32>) {
    let recorder = Recorder::new(vec![1, 2]);

    let result = batch_exec(
        |chunk: &[u32]| recorder.process(chunk),
        &items,
        &batch_policy(2, FailureMode::Ignore),
    );

    assert!(result.is_ok());
    assert_eq!(recorder.calls(), vec![vec![1, 2], vec![3, 4]]);
    assert!(recorder.completed().is_empty());
}

#[rstest]
fn test_abort_and_throw_stops_at_first_error(items: Vec<u32>) {
    let recorder = Recorder::new(vec![1]);

    let result = batch_exec(
        |chunk: &[u32]| recorder.process(chunk),
        &items,
        &batch_policy(2, FailureMode::AbortAndThrow),
    );

    assert_eq!(
        result,
        Err(AppError {
            kind: AppKind::Network,
            attempt: 1
        })
    );
    assert_eq!(recorder.calls(), vec![vec![1, 2]]);
}

#[rstest]
fn test_abort_and_throw_after_successful_chunks() {
    let items: Vec<u32> = (1..=6).collect();
    let recorder = Recorder::new(vec![2]);

    let result = batch_exec(
        |chunk: &[u32]| recorder.process(chunk),
        &items,
        &batch_policy(2, FailureMode::AbortAndThrow),
    );

    assert!(result.is_err());
    assert_eq!(recorder.completed(), vec![vec![1, 2]]);
    assert_eq!(recorder.calls().len(), 2);
}

#[rstest]
fn test_retry_chunk_succeeds_on_second_attempt(items: Vec<u32>) {
    let recorder = Recorder::new(vec![1]);

    let result = batch_exec(
        |chunk: &[u32]| recorder.process(chunk),
        &items,
        &batch_policy(2, FailureMode::Retry),
    );

    assert!(result.is_ok());
    assert_eq!(
        recorder.calls(),
        vec![vec![1, 2], vec![1, 2], vec![3, 4]]
    );
    assert_eq!(recorder.completed(), vec![vec![1, 2], vec![3, 4]]);
}

#[rstest]
fn test_retry_recovers_several_chunks(items: Vec<u32>) {
    // error, success, error, error, success
    let recorder = Recorder::new(vec![1, 3, 4]);

    let result = batch_exec(
        |chunk: &[u32]| recorder.process(chunk),
        &items,
        &batch_policy(2, FailureMode::Retry),
    );

    assert!(result.is_ok());
    assert_eq!(recorder.calls().len(), 5);
    assert_eq!(recorder.completed(), vec![vec![1, 2], vec![3, 4]]);
}

#[rstest]
fn test_retry_exhaustion_halts_remaining_chunks(items: Vec<u32>) {
    let recorder = Recorder::new(vec![1, 2, 3, 4]);

    let result = batch_exec(
        |chunk: &[u32]| recorder.process(chunk),
        &items,
        &batch_policy(2, FailureMode::Retry),
    );

    assert_eq!(
        result,
        Err(AppError {
            kind: AppKind::Network,
            attempt: 4
        })
    );
    assert!(recorder.calls().iter().all(|chunk| chunk == &vec![1, 2]));
}

#[rstest]
fn test_retry_abort_kind_halts_immediately(items: Vec<u32>) {
    let recorder = Recorder::failing_with(vec![1], AppKind::Validation);

    let result = batch_exec(
        |chunk: &[u32]| recorder.process(chunk),
        &items,
        &batch_policy(2, FailureMode::Retry),
    );

    assert_eq!(result.unwrap_err().kind, AppKind::Validation);
    assert_eq!(recorder.calls().len(), 1);
}

#[rstest]
#[tokio::test]
async fn test_async_ignore_swallows_chunk_error(items: Vec<u32>) {
    let recorder = Recorder::new(vec![1]);

    let result = batch_exec_async(
        |chunk: &[u32]| {
            let outcome = recorder.process(chunk);
            async move { outcome }
        },
        &items,
        &batch_policy(2, FailureMode::Ignore),
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(recorder.completed(), vec![vec![3, 4]]);
}

#[rstest]
#[tokio::test]
async fn test_async_retry_chunk_succeeds_on_second_attempt(items: Vec<u32>) {
    let recorder = Recorder::new(vec![1]);

    let result = batch_exec_async(
        |chunk: &[u32]| {
            let outcome = recorder.process(chunk);
            async move { outcome }
        },
        &items,
        &batch_policy(2, FailureMode::Retry),
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(recorder.calls().len(), 3);
}
