//! JSON file-based recording source.
//!
//! The recordings file plays the part of the backend: every fetch re-reads it
//! so edits made by other tools show up on the next refresh. Deletions rewrite
//! the file with an atomic write (write-to-temp + rename) so a crash never
//! leaves it half written.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "recordings": [
//!     {
//!       "recording_id": "1051_20200101200000",
//!       "channel": "PBS",
//!       "title": "Nova",
//!       "subtitle": "Black Holes",
//!       "original_air_date": "2019-10-02",
//!       "start_time": "2020-01-01T20:00:00Z",
//!       "end_time": "2020-01-01T21:00:00Z",
//!       "thumbnail": "/var/lib/recordings/1051_20200101200000.png"
//!     }
//!   ]
//! }
//! ```

use crate::domain::{Program, RecListError, Result};
use crate::storage::backend::RecordingSource;
use crate::storage::models::RecordingRecord;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Current version of the recordings file format.
const FORMAT_VERSION: u32 = 1;

/// Top-level structure of the recordings file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecordingsFile {
    /// Version of the file format for future migrations.
    version: u32,

    /// Recordings in backend order.
    #[serde(default)]
    recordings: Vec<RecordingRecord>,
}

impl Default for RecordingsFile {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            recordings: Vec::new(),
        }
    }
}

/// Recording source backed by a JSON file.
///
/// # Thread Safety
///
/// Reads take no lock. Deletions are serialized through an internal mutex so
/// two concurrent deletes cannot lose each other's update.
#[derive(Debug)]
pub struct JsonRecordingSource {
    /// Path to the recordings file.
    file_path: PathBuf,

    /// Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl JsonRecordingSource {
    /// Creates a source reading `file_path`.
    ///
    /// The file is not touched until the first fetch; a missing file reads as
    /// an empty recordings list.
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the path of the recordings file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Loads the recordings file.
    ///
    /// # Errors
    ///
    /// Returns [`RecListError::Source`] if the file cannot be read or parsed.
    fn load_from_file(&self) -> Result<RecordingsFile> {
        if !self.file_path.exists() {
            tracing::debug!(path = ?self.file_path, "recordings file missing, treating as empty");
            return Ok(RecordingsFile::default());
        }

        let contents = std::fs::read_to_string(&self.file_path).map_err(|e| {
            RecListError::Source(format!("failed to read {}: {e}", self.file_path.display()))
        })?;
        let data: RecordingsFile = serde_json::from_str(&contents)
            .map_err(|e| RecListError::Source(format!("failed to parse recordings JSON: {e}")))?;

        tracing::debug!(
            version = data.version,
            recordings = data.recordings.len(),
            "loaded recordings file"
        );
        Ok(data)
    }

    /// Saves the recordings file using an atomic write.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, the temporary write or the rename fails.
    fn save_to_file(&self, data: &RecordingsFile) -> Result<()> {
        tracing::debug!(path = ?self.file_path, "saving recordings file");

        let json = serde_json::to_string_pretty(data)
            .map_err(|e| RecListError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::debug!("recordings file saved");
        Ok(())
    }
}

impl RecordingSource for JsonRecordingSource {
    fn get_all_recordings(&self) -> Result<Vec<Program>> {
        let _span = tracing::debug_span!("json_get_all_recordings").entered();

        self.load_from_file()?
            .recordings
            .into_iter()
            .map(RecordingRecord::into_program)
            .collect()
    }

    fn delete_recording(&self, program: &Program) -> Result<()> {
        let _span = tracing::debug_span!("json_delete_recording",
            recording_id = %program.recording_id
        ).entered();

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut data = self.load_from_file()?;
        let before = data.recordings.len();
        data.recordings.retain(|record| !record.is_for(program));

        if data.recordings.len() == before {
            return Err(RecListError::Source(format!(
                "recording not found: {}",
                program.recording_id
            )));
        }

        self.save_to_file(&data)?;
        tracing::debug!(remaining = data.recordings.len(), "recording deleted");
        Ok(())
    }
}
