//! User interface layer: the list widget seam and its terminal rendering.
//!
//! The screen controller only talks to [`UiHandle`]. The terminal front-end
//! uses [`MemoryList`] as the widget, turns its snapshots into view models and
//! draws them with ANSI escapes.
//!
//! # Architecture
//!
//! ```text
//! ScreenController → UiHandle (MemoryList) → ListSnapshot → compute_viewmodel → render_frame
//! ```
//!
//! # Modules
//!
//! - [`handle`]: [`UiHandle`] capability trait, row handles and property names
//! - [`list`]: [`MemoryList`], the in-memory widget
//! - [`viewmodel`]: View model types and windowing around the selection
//! - [`terminal`]: ANSI frame rendering
//! - [`theme`]: Color schemes and escape sequence helpers

pub mod handle;
pub mod list;
pub mod terminal;
pub mod theme;
pub mod viewmodel;

pub use handle::{
    RowHandle, UiHandle, POSTER_PLACEHOLDER, PROP_DATE, PROP_POSTER, PROP_SORT_ASCENDING,
    PROP_SORT_BY, PROP_TIME, PROP_TITLE,
};
pub use list::{ListSnapshot, MemoryList, RowSnapshot};
pub use terminal::render_frame;
pub use theme::Theme;
pub use viewmodel::{compute_viewmodel, ScreenViewModel};
