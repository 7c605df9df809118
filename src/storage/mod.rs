//! Storage layer: the recordings data source and persisted settings.
//!
//! # Modules
//!
//! - `backend`: [`RecordingSource`] trait the screen fetches recordings from
//! - `json`: JSON file-based recording source
//! - `models`: on-disk record types, separate from the domain model
//! - `settings`: [`SettingsStore`] trait with JSON-file and in-memory stores

pub mod backend;
pub mod json;
pub mod models;
pub mod settings;

pub use backend::RecordingSource;
pub use json::JsonRecordingSource;
pub use models::RecordingRecord;
pub use settings::{JsonSettings, MemorySettings, SettingsStore};
