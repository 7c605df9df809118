//! Storage record models for the recordings file.
//!
//! These types mirror the on-disk layout. They are kept separate from the
//! domain [`Program`] so the file format can carry loosely-typed guide data
//! (air dates as strings, optional channel) without leaking that into the
//! screen.

use crate::domain::{Program, RecListError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Format of `original_air_date` in the recordings file.
const AIR_DATE_FORMAT: &str = "%Y-%m-%d";

/// One recording as stored in the recordings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingRecord {
    /// Backend identity of the recording.
    pub recording_id: String,

    /// Channel the program was recorded from.
    #[serde(default)]
    pub channel: String,

    /// Program title.
    pub title: String,

    /// Episode subtitle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Guide description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// First broadcast date as `YYYY-MM-DD`; empty or missing when unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_air_date: Option<String>,

    /// Recording start.
    pub start_time: DateTime<Utc>,

    /// Recording end; defaults to the start time when missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,

    /// Backend preview image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<PathBuf>,
}

impl RecordingRecord {
    /// Converts the record into a domain program.
    ///
    /// # Errors
    ///
    /// Returns [`RecListError::Source`] if the air date is present but not a
    /// valid `YYYY-MM-DD` date.
    pub fn into_program(self) -> Result<Program> {
        let original_air_date = match self.original_air_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(NaiveDate::parse_from_str(raw, AIR_DATE_FORMAT).map_err(|e| {
                RecListError::Source(format!(
                    "recording {}: invalid original air date {raw:?}: {e}",
                    self.recording_id
                ))
            })?),
        };

        Ok(Program {
            end_time: self.end_time.unwrap_or(self.start_time),
            recording_id: self.recording_id,
            channel: self.channel,
            title: self.title,
            subtitle: self.subtitle,
            description: self.description,
            original_air_date,
            start_time: self.start_time,
            thumbnail_source: self.thumbnail,
        })
    }

    /// Returns `true` if this record describes `program`.
    #[must_use]
    pub fn is_for(&self, program: &Program) -> bool {
        self.recording_id == program.recording_id
    }
}
