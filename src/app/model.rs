//! Program list model backing the recordings screen.
//!
//! [`ProgramListModel`] owns three views of the recordings that must stay in
//! lockstep:
//!
//! - `all_programs`: the unfiltered snapshot from the last refresh
//! - `programs`: the sorted sequence that is actually rendered
//! - `rows` / `row_to_program`: the list rows bound to `programs`, in order
//!
//! Only the interactive thread mutates the model. Background walks work on
//! the snapshots returned by [`all_programs`](ProgramListModel::all_programs)
//! and [`row_entries`](ProgramListModel::row_entries).

use super::sort::SortKey;
use crate::domain::{Program, Result};
use crate::storage::RecordingSource;
use crate::ui::RowHandle;
use std::collections::HashMap;
use std::sync::Arc;

/// Recordings held by the screen, sorted and bound to list rows.
#[derive(Debug, Clone, Default)]
pub struct ProgramListModel {
    all_programs: Vec<Arc<Program>>,
    programs: Vec<Arc<Program>>,
    rows: Vec<RowHandle>,
    row_to_program: HashMap<RowHandle, Arc<Program>>,

    /// Active sort key.
    pub sort_by: SortKey,

    /// Sort direction.
    pub sort_ascending: bool,

    /// Last known selection, restored after every rebuild.
    pub selected_index: usize,

    /// Recording group the list is meant to show.
    ///
    /// Persisted with the other screen settings but not applied: group
    /// filtering is reserved.
    pub group: String,
}

impl ProgramListModel {
    /// Creates an empty model with the given sort settings.
    #[must_use]
    pub fn new(sort_by: SortKey, sort_ascending: bool) -> Self {
        Self {
            sort_by,
            sort_ascending,
            ..Self::default()
        }
    }

    /// Replaces the snapshot with a fresh fetch from `source` and re-sorts.
    ///
    /// The selection is left alone; the next render restores it.
    ///
    /// # Errors
    ///
    /// Returns the data source error unchanged. The model is not modified
    /// when the fetch fails.
    pub fn refresh(&mut self, source: &dyn RecordingSource) -> Result<()> {
        let _span = tracing::debug_span!("model_refresh").entered();

        let fetched = source.get_all_recordings()?;
        tracing::debug!(count = fetched.len(), "recordings fetched");

        self.all_programs = fetched.into_iter().map(Arc::new).collect();
        self.recompute();
        Ok(())
    }

    /// Changes the sort settings and recomputes `programs` from the snapshot.
    pub fn apply_sort(&mut self, sort_by: SortKey, ascending: bool) {
        self.sort_by = sort_by;
        self.sort_ascending = ascending;
        self.recompute();
    }

    fn recompute(&mut self) {
        let mut programs = self.all_programs.clone();
        self.sort_by.sort(&mut programs, self.sort_ascending);
        self.programs = programs;
    }

    /// Binds one fresh row per program, replacing any previous binding.
    ///
    /// `handles` must hold exactly one handle per entry of `programs`.
    pub fn bind_rows(&mut self, handles: Vec<RowHandle>) {
        debug_assert_eq!(handles.len(), self.programs.len());
        self.row_to_program.clear();
        for (handle, program) in handles.iter().zip(&self.programs) {
            self.row_to_program.insert(*handle, Arc::clone(program));
        }
        self.rows = handles;
    }

    /// Removes a program that is rendered at `row_index`.
    ///
    /// Drops it from `programs`, the row list and the row mapping together,
    /// and from the snapshot so a later re-sort does not bring it back.
    /// Returns `false` (and changes nothing) when `row_index` does not hold
    /// `program`, which can happen if the list changed underneath a details
    /// view.
    pub fn remove_program(&mut self, program: &Program, row_index: usize) -> bool {
        let matches = self
            .programs
            .get(row_index)
            .is_some_and(|candidate| candidate.as_ref() == program)
            && row_index < self.rows.len();

        if !matches {
            tracing::warn!(
                recording_id = %program.recording_id,
                row_index = row_index,
                "program not found at row, skipping removal"
            );
            return false;
        }

        self.programs.remove(row_index);
        let row = self.rows.remove(row_index);
        self.row_to_program.remove(&row);

        if let Some(position) = self
            .all_programs
            .iter()
            .position(|candidate| candidate.as_ref() == program)
        {
            self.all_programs.remove(position);
        }

        tracing::debug!(
            recording_id = %program.recording_id,
            row = %row,
            remaining = self.programs.len(),
            "program removed"
        );
        true
    }

    /// Returns the unfiltered snapshot from the last refresh.
    #[must_use]
    pub fn all_programs(&self) -> &[Arc<Program>] {
        &self.all_programs
    }

    /// Returns the rendered sequence.
    #[must_use]
    pub fn programs(&self) -> &[Arc<Program>] {
        &self.programs
    }

    /// Returns the bound rows in display order.
    #[must_use]
    pub fn rows(&self) -> &[RowHandle] {
        &self.rows
    }

    /// Returns the program bound to `row`, if the row is current.
    #[must_use]
    pub fn program_for_row(&self, row: RowHandle) -> Option<&Arc<Program>> {
        self.row_to_program.get(&row)
    }

    /// Copies the row mapping in display order.
    #[must_use]
    pub fn row_entries(&self) -> Vec<(RowHandle, Arc<Program>)> {
        self.rows
            .iter()
            .filter_map(|row| self.row_to_program.get(row).map(|p| (*row, Arc::clone(p))))
            .collect()
    }
}
