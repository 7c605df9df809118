//! Artwork lookups used by the background workers.
//!
//! - `thumbnails`: [`ThumbnailCache`] copying backend previews into a local cache
//! - `fanart`: [`FanartSource`] picking series posters from a directory tree

pub mod fanart;
pub mod thumbnails;

pub use fanart::{DirectoryFanart, FanartSource, NoFanart};
pub use thumbnails::{FileThumbnailCache, ThumbnailCache};
