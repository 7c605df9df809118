//! Background thumbnail precaching.
//!
//! After each refresh every program's thumbnail is fetched once so the details
//! view and the poster filler find it in the cache. The walk is best effort:
//! a program whose thumbnail fails is logged and skipped.

use crate::app::middleware::{background_guard, ClosedFlag, Coalescer};
use crate::artwork::ThumbnailCache;
use crate::domain::{Program, Result};
use crate::worker::spawner::TaskSpawner;
use std::sync::Arc;

/// Warms the thumbnail cache on a background task.
pub struct ArtworkPrecacher {
    thumbnails: Arc<dyn ThumbnailCache>,
    spawner: Arc<dyn TaskSpawner>,
    closed: ClosedFlag,
    gate: Arc<Coalescer>,
}

impl std::fmt::Debug for ArtworkPrecacher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtworkPrecacher")
            .field("closed", &self.closed.is_closed())
            .field("running", &self.gate.is_running())
            .finish_non_exhaustive()
    }
}

impl ArtworkPrecacher {
    pub fn new(
        thumbnails: Arc<dyn ThumbnailCache>,
        spawner: Arc<dyn TaskSpawner>,
        closed: ClosedFlag,
    ) -> Self {
        Self {
            thumbnails,
            spawner,
            closed,
            gate: Arc::new(Coalescer::new()),
        }
    }

    /// Returns `true` while a walk is live.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.gate.is_running()
    }

    /// Starts a walk over a snapshot of `programs`.
    ///
    /// Returns `false` without doing anything when a walk is already live or
    /// the task could not be spawned.
    pub fn start(&self, programs: &[Arc<Program>]) -> bool {
        let Some(guard) = self.gate.try_enter() else {
            tracing::debug!("precache already running, request dropped");
            return false;
        };

        let snapshot = programs.to_vec();
        let thumbnails = Arc::clone(&self.thumbnails);
        let closed = self.closed.clone();

        let spawned = self.spawner.spawn(
            "reclist-precache",
            Box::new(move || {
                let _guard = guard;
                background_guard("precache", || precache(&snapshot, thumbnails.as_ref(), &closed));
            }),
        );

        match spawned {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "failed to start precache");
                false
            }
        }
    }
}

fn precache(programs: &[Arc<Program>], thumbnails: &dyn ThumbnailCache, closed: &ClosedFlag) -> Result<()> {
    let _span = tracing::debug_span!("precache", programs = programs.len()).entered();
    let mut processed = 0usize;
    let mut failed = 0usize;

    for program in programs {
        if closed.is_closed() {
            tracing::debug!(processed, "screen closed, precache stopped");
            return Ok(());
        }
        match thumbnails.get(program) {
            Ok(_) => processed += 1,
            Err(e) => {
                failed += 1;
                tracing::warn!(recording_id = %program.recording_id, error = %e, "thumbnail precache failed");
            }
        }
    }

    tracing::info!(processed, failed, "precache finished");
    Ok(())
}
