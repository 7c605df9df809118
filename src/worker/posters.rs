//! Background poster filling.
//!
//! Rows are rendered with a placeholder poster. This walk replaces each
//! placeholder with fan-art when the series has some, or with the recording's
//! cached thumbnail otherwise. Unlike the precacher it gives up on the first
//! failure: a broken thumbnail cache would fail every remaining row too.

use crate::app::middleware::{background_guard, ClosedFlag, Coalescer, UiLock};
use crate::artwork::{FanartSource, ThumbnailCache};
use crate::domain::{Program, Result};
use crate::ui::{RowHandle, UiHandle, PROP_POSTER};
use crate::worker::spawner::TaskSpawner;
use std::sync::Arc;

/// Collaborators shared by every poster walk.
struct PosterSources {
    ui: Arc<dyn UiHandle>,
    ui_lock: UiLock,
    fanart: Arc<dyn FanartSource>,
    thumbnails: Arc<dyn ThumbnailCache>,
    closed: ClosedFlag,
}

/// Writes poster properties onto rendered rows on a background task.
pub struct PosterFiller {
    sources: Arc<PosterSources>,
    spawner: Arc<dyn TaskSpawner>,
    gate: Arc<Coalescer>,
}

impl std::fmt::Debug for PosterFiller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PosterFiller")
            .field("running", &self.gate.is_running())
            .finish_non_exhaustive()
    }
}

impl PosterFiller {
    pub fn new(
        ui: Arc<dyn UiHandle>,
        ui_lock: UiLock,
        fanart: Arc<dyn FanartSource>,
        thumbnails: Arc<dyn ThumbnailCache>,
        spawner: Arc<dyn TaskSpawner>,
        closed: ClosedFlag,
    ) -> Self {
        Self {
            sources: Arc::new(PosterSources {
                ui,
                ui_lock,
                fanart,
                thumbnails,
                closed,
            }),
            spawner,
            gate: Arc::new(Coalescer::new()),
        }
    }

    /// Returns `true` while a walk is live.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.gate.is_running()
    }

    /// Starts a walk over the `(row, program)` pairs of the current render.
    ///
    /// Returns `false` without doing anything when a walk is already live or
    /// the task could not be spawned.
    pub fn start(&self, entries: Vec<(RowHandle, Arc<Program>)>) -> bool {
        let Some(guard) = self.gate.try_enter() else {
            tracing::debug!("poster filler already running, request dropped");
            return false;
        };

        let sources = Arc::clone(&self.sources);
        let spawned = self.spawner.spawn(
            "reclist-posters",
            Box::new(move || {
                let _guard = guard;
                background_guard("posters", || fill_posters(&entries, &sources));
            }),
        );

        match spawned {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "failed to start poster filler");
                false
            }
        }
    }
}

fn fill_posters(entries: &[(RowHandle, Arc<Program>)], sources: &PosterSources) -> Result<()> {
    let _span = tracing::debug_span!("fill_posters", rows = entries.len()).entered();
    let mut filled = 0usize;

    for (row, program) in entries {
        if sources.closed.is_closed() {
            tracing::debug!(filled, "screen closed, poster filling stopped");
            return Ok(());
        }

        let poster = match sources.fanart.random_poster(program) {
            Some(path) => path,
            None => sources.thumbnails.get(program)?,
        };
        let poster = poster.to_string_lossy();
        sources
            .ui_lock
            .locked(|| sources.ui.set_row_property(*row, PROP_POSTER, &poster));
        filled += 1;
    }

    tracing::debug!(filled, "poster filling finished");
    Ok(())
}
