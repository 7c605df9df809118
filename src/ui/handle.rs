//! Capability interface to the host's list widget and window.
//!
//! The screen controller never touches a global window. Everything it needs
//! from the host (the list control, window properties, error dialogs and
//! closing the window) goes through a [`UiHandle`] passed in at construction.
//! This keeps the host binding in a single adapter; [`MemoryList`] is the
//! in-process implementation used by the terminal front-end and the tests.
//!
//! [`MemoryList`]: crate::ui::MemoryList

use std::fmt;

/// Row property holding the program title.
pub const PROP_TITLE: &str = "title";

/// Row property holding the formatted recording date.
pub const PROP_DATE: &str = "date";

/// Row property holding the formatted start time.
pub const PROP_TIME: &str = "time";

/// Row property holding the poster image path.
pub const PROP_POSTER: &str = "poster";

/// Window property naming the active sort key.
pub const PROP_SORT_BY: &str = "sortBy";

/// Window property holding the sort direction as `"true"`/`"false"`.
pub const PROP_SORT_ASCENDING: &str = "sortAscending";

/// Poster value shown until a background walk supplies the real image.
pub const POSTER_PLACEHOLDER: &str = "loading.gif";

/// Opaque identifier for one visible list entry.
///
/// Handles are minted by the renderer for every rebuild and never reused, so
/// a write addressed to a row from an earlier rebuild can be recognised as
/// stale by the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowHandle(u64);

impl RowHandle {
    /// Wraps a raw row id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw row id.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row#{}", self.0)
    }
}

/// Host widget and window operations used by the screen.
///
/// All methods take `&self`: implementations use interior mutability because
/// the poster filler writes row properties from a background thread while the
/// interactive thread owns the controller.
///
/// # Row lifecycle
///
/// Rows are addressed by [`RowHandle`]. Properties may be set on a handle
/// before it is added to the list; writes to handles the widget has never
/// seen, or that were discarded by [`reset`](UiHandle::reset), are ignored.
pub trait UiHandle: Send + Sync {
    /// Binds the handle to the live window. Called once on first activation.
    fn attach(&self);

    /// Removes every row from the list.
    fn reset(&self);

    /// Appends rows in order.
    fn add_rows(&self, rows: &[RowHandle]);

    /// Moves the selection to `index`, clamped to the last row.
    fn select(&self, index: usize);

    /// Returns the selected position, or `None` when the list is empty.
    fn selected_position(&self) -> Option<usize>;

    /// Returns the selected row, or `None` when the list is empty.
    fn selected_row(&self) -> Option<RowHandle>;

    /// Sets a display property on a row.
    fn set_row_property(&self, row: RowHandle, key: &str, value: &str);

    /// Sets a property on the window, read by the skin.
    fn set_window_property(&self, key: &str, value: &str);

    /// Shows an error to the user.
    fn show_error(&self, message: &str);

    /// Closes the window.
    fn close(&self);
}
