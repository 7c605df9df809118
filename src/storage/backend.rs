//! Data source abstraction.
//!
//! This module defines the [`RecordingSource`] trait the screen fetches
//! recordings from: one call per use case, no generic query interface.

use crate::domain::{Program, Result};

/// Backend holding the recorded programs.
///
/// # Implementations
///
/// - [`JsonRecordingSource`](crate::storage::JsonRecordingSource): reads a
///   JSON recordings file (default)
///
/// # Examples
///
/// ```no_run
/// use reclist::storage::{JsonRecordingSource, RecordingSource};
///
/// let source = JsonRecordingSource::new("/tmp/recordings.json");
/// let recordings = source.get_all_recordings()?;
/// # Ok::<(), reclist::RecListError>(())
/// ```
pub trait RecordingSource: Send + Sync {
    /// Fetches every recording, in backend order.
    ///
    /// # Errors
    ///
    /// Returns [`RecListError::Source`](crate::RecListError::Source) when the
    /// backend cannot be reached or its answer cannot be read.
    fn get_all_recordings(&self) -> Result<Vec<Program>>;

    /// Deletes one recording.
    ///
    /// # Errors
    ///
    /// Returns an error if the recording is unknown or the backend refuses.
    fn delete_recording(&self, program: &Program) -> Result<()>;
}
