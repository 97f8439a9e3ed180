//! Common test utilities and fixtures
//!
//! - `AppError` / `AppKind`: an error type with a small kind hierarchy
//! - `Script`: an operation that plays back a fixed sequence of outcomes,
//!   repeating the last one once the sequence runs out

#![allow(dead_code)]

use simpleretry::kind::{Classify, ErrorKind};
use std::cell::Cell;

/// Kind hierarchy: `Timeout` and `Refused` refine `Network`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppKind {
    Network,
    Timeout,
    Refused,
    Business,
    Validation,
}

impl ErrorKind for AppKind {
    fn parent(self) -> Option<Self> {
        match self {
            AppKind::Timeout | AppKind::Refused => Some(AppKind::Network),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind:?} error on attempt {attempt}")]
pub struct AppError {
    pub kind: AppKind,
    pub attempt: usize,
}

impl Classify for AppError {
    type Kind = AppKind;

    fn kind(&self) -> AppKind {
        self.kind
    }
}

/// One scripted outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<T> {
    Return(T),
    Fail(AppKind),
}

/// An operation that replays `steps` and counts its invocations.
pub struct Script<T> {
    steps: Vec<Step<T>>,
    calls: Cell<usize>,
}

impl<T: Clone> Script<T> {
    pub fn new(steps: Vec<Step<T>>) -> Self {
        assert!(!steps.is_empty(), "a script needs at least one step");
        Self {
            steps,
            calls: Cell::new(0),
        }
    }

    /// Run the next step.
    pub fn call(&self) -> Result<T, AppError> {
        let attempt = self.calls.get() + 1;
        self.calls.set(attempt);

        let index = (attempt - 1).min(self.steps.len() - 1);
        match &self.steps[index] {
            Step::Return(value) => Ok(value.clone()),
            Step::Fail(kind) => Err(AppError {
                kind: *kind,
                attempt,
            }),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}
