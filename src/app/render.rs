//! Incremental rebuild of the recordings list.
//!
//! A full render runs three timed phases:
//!
//! 1. **Allocate**: mint one fresh row per program and bind them in the model
//! 2. **Stamp**: set title, date, time and the placeholder poster on every row,
//!    under the shared [`UiLock`]
//! 3. **Commit**: swap the widget's rows for the new ones and restore the
//!    selection
//!
//! Deleting a single program takes a fast path that drops its row from the
//! model and the widget without stamping anything again.

use super::middleware::{Timing, UiLock};
use super::model::ProgramListModel;
use crate::domain::Program;
use crate::ui::handle::{
    PROP_DATE, PROP_POSTER, PROP_SORT_ASCENDING, PROP_SORT_BY, PROP_TIME, PROP_TITLE,
    POSTER_PLACEHOLDER,
};
use crate::ui::{RowHandle, UiHandle};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Rebuilds the widget's rows from a [`ProgramListModel`].
pub struct IncrementalRenderer {
    ui: Arc<dyn UiHandle>,
    ui_lock: UiLock,
    timing: Timing,
    next_row: AtomicU64,
}

impl std::fmt::Debug for IncrementalRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncrementalRenderer")
            .field("timing", &self.timing)
            .field("next_row", &self.next_row)
            .finish_non_exhaustive()
    }
}

impl IncrementalRenderer {
    /// Creates a renderer writing to `ui`, sharing `ui_lock` with background
    /// walks that also write row properties.
    #[must_use]
    pub fn new(ui: Arc<dyn UiHandle>, ui_lock: UiLock, timing: Timing) -> Self {
        Self {
            ui,
            ui_lock,
            timing,
            next_row: AtomicU64::new(1),
        }
    }

    /// Publishes the sort settings and rebuilds every row.
    pub fn render(&self, model: &mut ProgramListModel) {
        let _span = tracing::debug_span!("render", programs = model.programs().len()).entered();

        self.render_nav(model);
        self.timing.timed("render_programs", || {
            self.timing.timed("allocate", || self.allocate(model));
            self.timing.timed("stamp", || self.stamp(model));
            self.timing.timed("commit", || self.commit(model));
        });
    }

    fn render_nav(&self, model: &ProgramListModel) {
        self.ui.set_window_property(PROP_SORT_BY, model.sort_by.name());
        self.ui
            .set_window_property(PROP_SORT_ASCENDING, if model.sort_ascending { "true" } else { "false" });
    }

    fn allocate(&self, model: &mut ProgramListModel) {
        let count = model.programs().len() as u64;
        let first = self.next_row.fetch_add(count, Ordering::Relaxed);
        let handles = (first..first + count).map(RowHandle::new).collect();
        model.bind_rows(handles);
    }

    fn stamp(&self, model: &ProgramListModel) {
        self.ui_lock.locked(|| {
            for (row, program) in model.rows().iter().zip(model.programs()) {
                self.ui.set_row_property(*row, PROP_TITLE, &program.full_title());
                self.ui.set_row_property(*row, PROP_DATE, &program.formatted_air_date());
                self.ui.set_row_property(*row, PROP_TIME, &program.formatted_start_time());
                self.ui.set_row_property(*row, PROP_POSTER, POSTER_PLACEHOLDER);
            }
        });
    }

    fn commit(&self, model: &ProgramListModel) {
        self.ui.reset();
        self.ui.add_rows(model.rows());
        self.ui.select(model.selected_index);
    }

    /// Removes one deleted program without a full rebuild.
    ///
    /// The selection stays at `index`, which now points at the following
    /// program (or the new last one if the deleted row was last). Returns
    /// `false` if the model did not hold `program` at `index`; the widget is
    /// left untouched in that case.
    pub fn render_program_deleted(&self, model: &mut ProgramListModel, program: &Program, index: usize) -> bool {
        if !model.remove_program(program, index) {
            return false;
        }
        self.ui.reset();
        self.ui.add_rows(model.rows());
        self.ui.select(index);
        model.selected_index = self.ui.selected_position().unwrap_or_default();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::sort::SortKey;
    use crate::domain::Result;
    use crate::storage::RecordingSource;
    use crate::ui::MemoryList;
    use chrono::{Duration, TimeZone, Utc};

    struct FixedSource(Vec<Program>);

    impl RecordingSource for FixedSource {
        fn get_all_recordings(&self) -> Result<Vec<Program>> {
            Ok(self.0.clone())
        }

        fn delete_recording(&self, _program: &Program) -> Result<()> {
            Ok(())
        }
    }

    fn programs(titles: &[&str]) -> Vec<Program> {
        let base = Utc.with_ymd_and_hms(2021, 1, 1, 20, 0, 0).unwrap();
        titles
            .iter()
            .enumerate()
            .map(|(i, title)| Program::new(format!("rec{i}"), *title, base + Duration::hours(i as i64)))
            .collect()
    }

    fn setup(titles: &[&str]) -> (Arc<MemoryList>, IncrementalRenderer, ProgramListModel) {
        let list = Arc::new(MemoryList::new());
        let renderer = IncrementalRenderer::new(list.clone(), UiLock::new(), Timing::Disabled);
        let mut model = ProgramListModel::new(SortKey::Title, true);
        model.refresh(&FixedSource(programs(titles))).unwrap();
        (list, renderer, model)
    }

    #[test]
    fn render_stamps_every_row_with_placeholder() {
        let (list, renderer, mut model) = setup(&["Zoo", "Ant", "Moth"]);
        renderer.render(&mut model);

        let snapshot = list.snapshot();
        assert_eq!(snapshot.column(PROP_TITLE), vec!["Ant", "Moth", "Zoo"]);
        assert_eq!(snapshot.column(PROP_POSTER), vec![POSTER_PLACEHOLDER; 3]);
        assert_eq!(snapshot.column(PROP_TIME)[0], "09:00 PM");
        assert_eq!(snapshot.window_property(PROP_SORT_BY), Some("Title"));
        assert_eq!(snapshot.window_property(PROP_SORT_ASCENDING), Some("true"));
        assert_eq!(model.rows().len(), 3);
    }

    #[test]
    fn render_restores_selection_clamped() {
        let (list, renderer, mut model) = setup(&["a", "b"]);
        model.selected_index = 9;
        renderer.render(&mut model);
        assert_eq!(list.selected_position(), Some(1));
    }

    #[test]
    fn rebuild_mints_fresh_rows() {
        let (list, renderer, mut model) = setup(&["a", "b"]);
        renderer.render(&mut model);
        let first = model.rows().to_vec();
        renderer.render(&mut model);
        assert!(model.rows().iter().all(|row| !first.contains(row)));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn fast_path_removal_matches_full_rebuild() {
        let (list, renderer, mut model) = setup(&["Zoo", "Ant", "Moth"]);
        renderer.render(&mut model);

        let moth = Arc::clone(&model.programs()[1]);
        assert!(renderer.render_program_deleted(&mut model, &moth, 1));
        let fast = list.snapshot();

        let (rebuilt_list, rebuilt_renderer, mut rebuilt) = setup(&["Zoo", "Ant"]);
        rebuilt.selected_index = 1;
        rebuilt_renderer.render(&mut rebuilt);
        let full = rebuilt_list.snapshot();

        assert_eq!(fast.column(PROP_TITLE), full.column(PROP_TITLE));
        assert_eq!(fast.column(PROP_DATE), full.column(PROP_DATE));
        assert_eq!(fast.column(PROP_POSTER), full.column(PROP_POSTER));
        assert_eq!(fast.selected, full.selected);
        assert_eq!(model.programs().len(), rebuilt.programs().len());
    }

    #[test]
    fn deleting_the_last_row_selects_the_new_last_row() {
        let (list, renderer, mut model) = setup(&["Ant", "Zoo"]);
        renderer.render(&mut model);

        let zoo = Arc::clone(&model.programs()[1]);
        assert!(renderer.render_program_deleted(&mut model, &zoo, 1));
        assert_eq!(list.selected_position(), Some(0));
        assert_eq!(list.snapshot().column(PROP_TITLE), vec!["Ant"]);
        assert_eq!(model.selected_index, 0);
    }

    #[test]
    fn failed_fast_path_leaves_widget_alone() {
        let (list, renderer, mut model) = setup(&["Ant", "Zoo"]);
        renderer.render(&mut model);
        let before = list.snapshot();

        let zoo = Arc::clone(&model.programs()[1]);
        assert!(!renderer.render_program_deleted(&mut model, &zoo, 0));
        assert_eq!(list.snapshot(), before);
    }
}
