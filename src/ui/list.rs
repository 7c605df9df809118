//! In-memory list widget implementing [`UiHandle`].
//!
//! [`MemoryList`] plays the part of the host's list control: it keeps the row
//! membership, per-row properties, the selection and window properties behind
//! a mutex, and exposes snapshots for rendering. The terminal front-end draws
//! from these snapshots and the tests assert on them.
//!
//! # Stale rows
//!
//! Row handles are minted in increasing order. A handle whose id is above the
//! highest id ever added is a pending row (stamped before commit) and accepts
//! properties. A handle at or below that mark that is no longer a member of
//! the list is stale: its properties are dropped on the next [`add_rows`]
//! and any later write to it is ignored.
//!
//! [`add_rows`]: UiHandle::add_rows

use super::handle::{RowHandle, UiHandle};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

/// Display properties of one row.
pub type RowProperties = BTreeMap<String, String>;

#[derive(Debug, Default)]
struct ListState {
    attached: bool,
    closed: bool,
    rows: Vec<RowHandle>,
    properties: HashMap<RowHandle, RowProperties>,
    high_water: u64,
    selected: usize,
    window_properties: BTreeMap<String, String>,
    errors: Vec<String>,
}

impl ListState {
    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
    }

    fn collect_stale(&mut self) {
        let members: HashSet<RowHandle> = self.rows.iter().copied().collect();
        let high_water = self.high_water;
        self.properties
            .retain(|handle, _| handle.id() > high_water || members.contains(handle));
    }
}

/// One row as seen at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSnapshot {
    /// Handle of the row.
    pub handle: RowHandle,
    /// Properties set on the row.
    pub properties: RowProperties,
}

impl RowSnapshot {
    /// Returns a property value, if set.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// Point-in-time copy of the widget state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSnapshot {
    /// Rows in display order.
    pub rows: Vec<RowSnapshot>,
    /// Selected position, `None` when the list is empty.
    pub selected: Option<usize>,
    /// Window properties.
    pub window_properties: BTreeMap<String, String>,
}

impl ListSnapshot {
    /// Returns the value of one property for every row, in display order.
    #[must_use]
    pub fn column(&self, key: &str) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.property(key).unwrap_or_default().to_string())
            .collect()
    }

    /// Returns a window property, if set.
    #[must_use]
    pub fn window_property(&self, key: &str) -> Option<&str> {
        self.window_properties.get(key).map(String::as_str)
    }
}

/// Thread-safe in-memory list control.
#[derive(Debug, Default)]
pub struct MemoryList {
    state: Mutex<ListState>,
}

impl MemoryList {
    /// Creates an empty, detached list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Copies the current rows, selection and window properties.
    #[must_use]
    pub fn snapshot(&self) -> ListSnapshot {
        let state = self.lock();
        let rows = state
            .rows
            .iter()
            .map(|handle| RowSnapshot {
                handle: *handle,
                properties: state.properties.get(handle).cloned().unwrap_or_default(),
            })
            .collect();
        ListSnapshot {
            rows,
            selected: if state.rows.is_empty() { None } else { Some(state.selected) },
            window_properties: state.window_properties.clone(),
        }
    }

    /// Moves the selection down by one, wrapping to the top.
    pub fn move_selection_down(&self) {
        let mut state = self.lock();
        if state.rows.is_empty() {
            return;
        }
        state.selected = (state.selected + 1) % state.rows.len();
    }

    /// Moves the selection up by one, wrapping to the bottom.
    pub fn move_selection_up(&self) {
        let mut state = self.lock();
        if state.rows.is_empty() {
            return;
        }
        if state.selected == 0 {
            state.selected = state.rows.len() - 1;
        } else {
            state.selected -= 1;
        }
    }

    /// Returns the number of rows currently in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    /// Returns `true` when the list has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().rows.is_empty()
    }

    /// Returns `true` once [`UiHandle::attach`] has been called.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.lock().attached
    }

    /// Returns `true` once [`UiHandle::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Returns the errors shown so far and clears them.
    pub fn take_errors(&self) -> Vec<String> {
        std::mem::take(&mut self.lock().errors)
    }
}

impl UiHandle for MemoryList {
    fn attach(&self) {
        self.lock().attached = true;
    }

    fn reset(&self) {
        let mut state = self.lock();
        state.rows.clear();
        state.selected = 0;
    }

    fn add_rows(&self, rows: &[RowHandle]) {
        let mut state = self.lock();
        state.rows.extend_from_slice(rows);
        if let Some(max) = rows.iter().map(|row| row.id()).max() {
            state.high_water = state.high_water.max(max);
        }
        state.collect_stale();
        state.clamp_selection();
    }

    fn select(&self, index: usize) {
        let mut state = self.lock();
        state.selected = index;
        state.clamp_selection();
    }

    fn selected_position(&self) -> Option<usize> {
        let state = self.lock();
        if state.rows.is_empty() {
            None
        } else {
            Some(state.selected)
        }
    }

    fn selected_row(&self) -> Option<RowHandle> {
        let state = self.lock();
        state.rows.get(state.selected).copied()
    }

    fn set_row_property(&self, row: RowHandle, key: &str, value: &str) {
        let mut state = self.lock();
        let pending = row.id() > state.high_water;
        if let Some(properties) = state.properties.get_mut(&row) {
            properties.insert(key.to_string(), value.to_string());
        } else if pending || state.rows.contains(&row) {
            state
                .properties
                .entry(row)
                .or_default()
                .insert(key.to_string(), value.to_string());
        } else {
            tracing::trace!(row = %row, key = key, "ignoring write to stale row");
        }
    }

    fn set_window_property(&self, key: &str, value: &str) {
        self.lock()
            .window_properties
            .insert(key.to_string(), value.to_string());
    }

    fn show_error(&self, message: &str) {
        self.lock().errors.push(message.to_string());
    }

    fn close(&self) {
        self.lock().closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::handle::PROP_TITLE;

    fn rows(ids: &[u64]) -> Vec<RowHandle> {
        ids.iter().copied().map(RowHandle::new).collect()
    }

    #[test]
    fn selection_is_clamped_to_last_row() {
        let list = MemoryList::new();
        list.add_rows(&rows(&[1, 2, 3]));
        list.select(10);
        assert_eq!(list.selected_position(), Some(2));
        assert_eq!(list.selected_row(), Some(RowHandle::new(3)));
    }

    #[test]
    fn empty_list_has_no_selection() {
        let list = MemoryList::new();
        list.select(4);
        assert_eq!(list.selected_position(), None);
        assert_eq!(list.selected_row(), None);
    }

    #[test]
    fn pending_rows_accept_properties_before_commit() {
        let list = MemoryList::new();
        let pending = RowHandle::new(7);
        list.set_row_property(pending, PROP_TITLE, "Nova");
        list.add_rows(&[pending]);
        assert_eq!(list.snapshot().column(PROP_TITLE), vec!["Nova"]);
    }

    #[test]
    fn writes_to_replaced_rows_are_ignored() {
        let list = MemoryList::new();
        let old = RowHandle::new(1);
        list.set_row_property(old, PROP_TITLE, "old");
        list.add_rows(&[old]);

        let new = RowHandle::new(2);
        list.set_row_property(new, PROP_TITLE, "new");
        list.reset();
        list.add_rows(&[new]);

        list.set_row_property(old, PROP_TITLE, "late");
        let snapshot = list.snapshot();
        assert_eq!(snapshot.column(PROP_TITLE), vec!["new"]);
        assert_eq!(snapshot.rows.len(), 1);
    }

    #[test]
    fn re_adding_rows_keeps_their_properties() {
        let list = MemoryList::new();
        let handles = rows(&[1, 2, 3]);
        for (handle, title) in handles.iter().zip(["a", "b", "c"]) {
            list.set_row_property(*handle, PROP_TITLE, title);
        }
        list.add_rows(&handles);

        list.reset();
        list.add_rows(&[handles[0], handles[2]]);
        assert_eq!(list.snapshot().column(PROP_TITLE), vec!["a", "c"]);

        list.set_row_property(handles[1], PROP_TITLE, "late");
        assert_eq!(list.snapshot().column(PROP_TITLE), vec!["a", "c"]);
    }

    #[test]
    fn member_rows_without_properties_accept_writes() {
        let list = MemoryList::new();
        let handles = rows(&[1, 2]);
        list.add_rows(&handles);
        list.set_row_property(handles[1], PROP_TITLE, "late");
        assert_eq!(list.snapshot().column(PROP_TITLE), vec!["", "late"]);
    }

    #[test]
    fn navigation_wraps_around() {
        let list = MemoryList::new();
        list.add_rows(&rows(&[1, 2]));
        list.move_selection_up();
        assert_eq!(list.selected_position(), Some(1));
        list.move_selection_down();
        assert_eq!(list.selected_position(), Some(0));
    }
}
