//! Background walks launched after each refresh.
//!
//! Both walks run off the interactive thread, are coalesced (a second start
//! while one is live is dropped) and stop early once the screen is closed.
//!
//! # Architecture
//!
//! - `spawner`: [`TaskSpawner`] seam with thread-backed and inline runners
//! - `precache`: [`ArtworkPrecacher`] warming the thumbnail cache
//! - `posters`: [`PosterFiller`] replacing placeholder posters on rows

pub mod posters;
pub mod precache;
pub mod spawner;

pub use posters::PosterFiller;
pub use precache::ArtworkPrecacher;
pub use spawner::{InlineSpawner, Task, TaskSpawner, ThreadSpawner};
