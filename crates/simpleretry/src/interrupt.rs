//! Interruptible pauses between attempts and chunks.
//!
//! Every delay the executors take goes through an [`Interrupt`]. Interrupting
//! ends the pause early and the executor carries on as if the delay had
//! elapsed; an interruption is never reported as an error.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;

/// How a pause ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// The full delay passed
    Elapsed,
    /// An interrupt cut the delay short
    Interrupted,
}

/// A cloneable handle that cuts pauses short.
///
/// An interrupt is one-shot: it wakes the pause in progress, or if no pause
/// is in progress, the next non-zero one. Once a pause has observed it the
/// interrupt is consumed and later pauses run for their full delay.
///
/// # Examples
///
/// ```rust
/// use simpleretry::interrupt::{Interrupt, Pause};
/// use std::time::Duration;
///
/// let interrupt = Interrupt::new();
/// interrupt.interrupt();
///
/// // Returns immediately instead of sleeping for an hour.
/// assert_eq!(interrupt.pause(Duration::from_secs(3600)), Pause::Interrupted);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    pending: Mutex<bool>,
    wake: Condvar,
    notify: Notify,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, bool> {
        // The flag is a plain bool, a poisoned lock still holds a valid value.
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Interrupt {
    /// Create a handle with no interrupt pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wake the current pause, or the next one if none is running.
    pub fn interrupt(&self) {
        *self.inner.lock() = true;
        self.inner.wake.notify_all();
        self.inner.notify.notify_waiters();
    }

    /// Whether an interrupt is waiting to be observed.
    pub fn is_pending(&self) -> bool {
        *self.inner.lock()
    }

    /// Block the calling thread for `delay` or until interrupted.
    ///
    /// A zero delay returns [`Pause::Elapsed`] at once and leaves a pending
    /// interrupt for the next pause.
    pub fn pause(&self, delay: Duration) -> Pause {
        if delay.is_zero() {
            return Pause::Elapsed;
        }

        let guard = self.inner.lock();
        let (mut pending, _) = self
            .inner
            .wake
            .wait_timeout_while(guard, delay, |pending| !*pending)
            .unwrap_or_else(PoisonError::into_inner);

        if std::mem::take(&mut *pending) {
            Pause::Interrupted
        } else {
            Pause::Elapsed
        }
    }

    /// Async counterpart of [`Interrupt::pause`], sleeping with `tokio::time`.
    pub async fn pause_async(&self, delay: Duration) -> Pause {
        if delay.is_zero() {
            return Pause::Elapsed;
        }

        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);

        loop {
            // Register for wakeups before checking the flag so an interrupt
            // landing in between is not lost.
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.take_pending() {
                return Pause::Interrupted;
            }

            tokio::select! {
                () = &mut sleep => return Pause::Elapsed,
                () = &mut notified => {}
            }
        }
    }

    fn take_pending(&self) -> bool {
        std::mem::take(&mut *self.inner.lock())
    }
}
