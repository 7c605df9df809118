//! Application layer coordinating the recordings screen.
//!
//! This module sits between the host front-end (main.rs) and the storage,
//! artwork and worker layers. The host forwards lifecycle callbacks to the
//! [`ScreenController`], which mutates the [`ProgramListModel`] on the
//! interactive thread and hands snapshots to background walks.
//!
//! # Architecture
//!
//! ```text
//! Host callback → ScreenController → Model update → IncrementalRenderer → UiHandle
//!                                          │
//!                                          └──→ ArtworkPrecacher / PosterFiller
//! ```
//!
//! # Modules
//!
//! - [`cursor`]: Wrapping cursor used by the details view
//! - [`middleware`]: Timing, locking, guarding and coalescing wrappers
//! - [`model`]: Sorted program list bound to list rows
//! - [`render`]: Full and fast-path list rebuilds
//! - [`screen`]: The screen state machine and its click dispatch table
//! - [`sort`]: Registered sort keys

pub mod cursor;
pub mod middleware;
pub mod model;
pub mod render;
pub mod screen;
pub mod sort;

pub use cursor::CyclingBidiIterator;
pub use middleware::{ClosedFlag, Coalescer, Timing, UiLock};
pub use model::ProgramListModel;
pub use render::IncrementalRenderer;
pub use screen::{
    ActionId, ControlId, DetailsContext, DetailsOutcome, DetailsView, ScreenController,
    ScreenServices, ScreenState,
};
pub use sort::{sort_by_name, SortKey};
