//! Task spawning seam for background walks.
//!
//! The screen never creates threads directly; it hands boxed closures to a
//! [`TaskSpawner`]. Production code uses [`ThreadSpawner`], tests use
//! [`InlineSpawner`] so walks finish before `start` returns.

use crate::domain::{RecListError, Result};

/// A unit of background work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs background tasks.
pub trait TaskSpawner: Send + Sync {
    /// Schedules `task` under a human-readable `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RecListError::Worker`] if the task could not be scheduled.
    fn spawn(&self, name: &str, task: Task) -> Result<()>;
}

/// Spawns each task on its own named OS thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSpawner;

impl TaskSpawner for ThreadSpawner {
    fn spawn(&self, name: &str, task: Task) -> Result<()> {
        std::thread::Builder::new()
            .name(name.to_string())
            .spawn(task)
            .map(|_| ())
            .map_err(|e| RecListError::Worker(format!("failed to spawn {name}: {e}")))
    }
}

/// Runs each task synchronously on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineSpawner;

impl TaskSpawner for InlineSpawner {
    fn spawn(&self, name: &str, task: Task) -> Result<()> {
        tracing::trace!(task = name, "running task inline");
        task();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn inline_spawner_runs_before_returning() {
        let (tx, rx) = mpsc::channel();
        InlineSpawner
            .spawn("inline", Box::new(move || tx.send(7).unwrap()))
            .unwrap();
        assert_eq!(rx.try_recv().unwrap(), 7);
    }

    #[test]
    fn thread_spawner_names_the_thread() {
        let (tx, rx) = mpsc::channel();
        ThreadSpawner
            .spawn(
                "reclist-test",
                Box::new(move || {
                    let name = std::thread::current().name().map(str::to_string);
                    tx.send(name).unwrap();
                }),
            )
            .unwrap();
        assert_eq!(rx.recv().unwrap().as_deref(), Some("reclist-test"));
    }
}
