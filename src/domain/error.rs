//! Error types for the recordings screen.
//!
//! This module defines the centralized error type [`RecListError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.

use thiserror::Error;

/// The main error type for recordings screen operations.
///
/// Variants follow the collaborators the controller talks to: the data source,
/// the artwork caches, the settings store and the background task machinery.
/// Parse failures from `serde_json` and `toml` are mapped into the string
/// variants with context rather than wrapped, so the error stays cheap to log.
///
/// # Examples
///
/// ```
/// use reclist::RecListError;
///
/// fn fetch() -> Result<(), RecListError> {
///     Err(RecListError::Source("backend unreachable".to_string()))
/// }
///
/// assert!(fetch().unwrap_err().is_source());
/// ```
#[derive(Debug, Error)]
pub enum RecListError {
    /// Fetching or mutating recordings at the data source failed.
    ///
    /// Covers connectivity problems and unreadable recording lists. These are
    /// not retried locally; the screen surfaces them to the user.
    #[error("Data source error: {0}")]
    Source(String),

    /// A thumbnail could not be produced for a recording.
    #[error("Thumbnail error: {0}")]
    Thumbnail(String),

    /// Reading or writing persisted settings failed.
    #[error("Settings error: {0}")]
    Settings(String),

    /// A storage file could not be parsed or serialized.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations. Automatically converts
    /// from `std::io::Error` using the `#[from]` attribute.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A background task could not be started.
    #[error("Worker error: {0}")]
    Worker(String),

    /// The details view failed while it was shown.
    #[error("Details view error: {0}")]
    Details(String),
}

impl RecListError {
    /// Returns `true` for data source failures, which are shown to the user.
    #[must_use]
    pub const fn is_source(&self) -> bool {
        matches!(self, Self::Source(_))
    }
}

/// A specialized `Result` type for recordings screen operations.
pub type Result<T> = std::result::Result<T, RecListError>;
