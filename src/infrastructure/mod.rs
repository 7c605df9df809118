//! Infrastructure layer for filesystem and environment interactions.
//!
//! This module provides path handling: locating the data directory, expanding
//! `~` in configured paths and deriving cache file names.

pub mod paths;

pub use paths::{expand_tilde, get_data_dir, sanitize_file_name};
