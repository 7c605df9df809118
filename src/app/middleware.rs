//! Cross-cutting wrappers composed around screen operations.
//!
//! Each wrapper is a small value that runs a closure with one extra concern
//! attached, so the renderer and the background walkers read as plain
//! sequences of steps:
//!
//! - [`Timing`]: reports how long a phase took (or does nothing)
//! - [`UiLock`]: serializes row property writes between the interactive
//!   thread and background walks
//! - [`interactive_guard`] / [`background_guard`]: log and swallow failures so
//!   one bad event or one bad walk never takes the window down
//! - [`Coalescer`]: lets at most one walk of a kind run at a time
//! - [`ClosedFlag`]: cooperative cancellation shared with background walks
//!
//! Every wrapper has a variant or constructor that makes tests deterministic.

use crate::domain::{RecListError, Result};
use crate::ui::UiHandle;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Phase timing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timing {
    /// Log elapsed milliseconds for each phase at debug level.
    #[default]
    Traced,
    /// Run phases without measuring them.
    Disabled,
}

impl Timing {
    /// Runs `f`, reporting its duration under `label` when tracing is enabled.
    pub fn timed<R>(self, label: &'static str, f: impl FnOnce() -> R) -> R {
        match self {
            Self::Disabled => f(),
            Self::Traced => {
                let started = Instant::now();
                let result = f();
                let elapsed = started.elapsed();
                tracing::debug!(
                    phase = label,
                    elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                    "phase finished"
                );
                result
            }
        }
    }
}

/// Exclusive section around widget property writes.
///
/// Clones share the same lock. The stamp phase of a rebuild and every poster
/// write from the background filler go through [`locked`](Self::locked).
#[derive(Debug, Clone, Default)]
pub struct UiLock {
    inner: Arc<Mutex<()>>,
}

impl UiLock {
    /// Creates a new, unshared lock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` while holding the lock.
    pub fn locked<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f()
    }
}

/// Cooperative cancellation flag for background walks.
///
/// Set once when the screen is torn down; walks check it before each item.
#[derive(Debug, Clone, Default)]
pub struct ClosedFlag {
    inner: Arc<AtomicBool>,
}

impl ClosedFlag {
    /// Creates an open (not closed) flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the screen closed.
    pub fn close(&self) {
        self.inner.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.load(Ordering::SeqCst)
    }
}

/// Admits at most one live walk at a time.
///
/// A call made while a walk holds the gate is dropped (`try_enter` returns
/// `None`) rather than queued or restarted.
#[derive(Debug, Default)]
pub struct Coalescer {
    running: AtomicBool,
}

impl Coalescer {
    /// Creates an idle gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the gate, or returns `None` if a walk already holds it.
    ///
    /// The gate is released when the returned guard is dropped.
    #[must_use]
    pub fn try_enter(self: &Arc<Self>) -> Option<CoalesceGuard> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| CoalesceGuard {
                gate: Arc::clone(self),
            })
    }

    /// Returns `true` while a walk holds the gate.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Releases its [`Coalescer`] on drop.
#[derive(Debug)]
pub struct CoalesceGuard {
    gate: Arc<Coalescer>,
}

impl Drop for CoalesceGuard {
    fn drop(&mut self) {
        self.gate.running.store(false, Ordering::Release);
    }
}

/// Runs an input handler, logging and swallowing any error.
///
/// Data source failures are also shown to the user through
/// [`UiHandle::show_error`]; everything else is only logged.
pub fn interactive_guard(label: &'static str, ui: &dyn UiHandle, f: impl FnOnce() -> Result<()>) {
    if let Err(e) = f() {
        tracing::error!(handler = label, error = %e, "input handler failed");
        if e.is_source() {
            ui.show_error(&e.to_string());
        }
    }
}

/// Runs the whole body of a background walk, containing errors and panics.
///
/// Returns `true` when the body completed without error.
pub fn background_guard(label: &'static str, f: impl FnOnce() -> Result<()>) -> bool {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::error!(task = label, error = %e, "background task failed");
            false
        }
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(ToString::to_string)
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            let error = RecListError::Worker(message);
            tracing::error!(task = label, error = %error, "background task panicked");
            false
        }
    }
}
