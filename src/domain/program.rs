//! Recorded program domain model.
//!
//! This module defines the `Program` type representing one recording known to
//! the backend. The screen never mutates programs; it sorts them, maps list
//! rows onto them and hands them to the artwork caches.

use chrono::{DateTime, NaiveDate, Utc};
use std::path::PathBuf;

/// Format used for the `date` row property, e.g. `Wed Oct 02`.
const AIR_DATE_FORMAT: &str = "%a %b %d";

/// Format used for the `time` row property, e.g. `08:00 PM`.
const START_TIME_FORMAT: &str = "%I:%M %p";

/// A recorded TV program.
///
/// Equality compares every field, so two snapshots of the same recording
/// taken from different fetches compare equal as long as the backend did not
/// change it. `recording_id` is the stable identity used as a cache key.
///
/// # Fields
///
/// - `recording_id`: Backend identity of the recording
/// - `channel`: Channel name or number the program was recorded from
/// - `title`, `subtitle`, `description`: Guide data
/// - `original_air_date`: First broadcast date, when the guide knows it
/// - `start_time`, `end_time`: Recording window
/// - `thumbnail_source`: Preview image produced by the backend, if any
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Program {
    pub recording_id: String,
    pub channel: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub original_air_date: Option<NaiveDate>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub thumbnail_source: Option<PathBuf>,
}

impl Program {
    /// Creates a program with the minimum guide data.
    ///
    /// The recording is assumed to last one hour; subtitle, description, air
    /// date and thumbnail are left empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use reclist::Program;
    ///
    /// let start = Utc.with_ymd_and_hms(2020, 1, 1, 20, 0, 0).unwrap();
    /// let program = Program::new("1051_20200101200000", "Nova", start);
    /// assert_eq!(program.full_title(), "Nova");
    /// assert!(program.original_air_date.is_none());
    /// ```
    #[must_use]
    pub fn new(recording_id: impl Into<String>, title: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        Self {
            recording_id: recording_id.into(),
            channel: String::new(),
            title: title.into(),
            subtitle: None,
            description: None,
            original_air_date: None,
            start_time,
            end_time: start_time + chrono::Duration::hours(1),
            thumbnail_source: None,
        }
    }

    /// Sets the original air date.
    #[must_use]
    pub fn with_original_air_date(mut self, date: NaiveDate) -> Self {
        self.original_air_date = Some(date);
        self
    }

    /// Sets the episode subtitle.
    #[must_use]
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Sets the backend preview image.
    #[must_use]
    pub fn with_thumbnail_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.thumbnail_source = Some(path.into());
        self
    }

    /// Returns the title joined with the subtitle, if there is one.
    ///
    /// ```
    /// # use chrono::Utc;
    /// # use reclist::Program;
    /// let program = Program::new("1", "Nova", Utc::now()).with_subtitle("Black Holes");
    /// assert_eq!(program.full_title(), "Nova: Black Holes");
    /// ```
    #[must_use]
    pub fn full_title(&self) -> String {
        match self.subtitle.as_deref() {
            Some(subtitle) if !subtitle.is_empty() => format!("{}: {subtitle}", self.title),
            _ => self.title.clone(),
        }
    }

    /// Returns the original air date for the list's `date` column, or an
    /// empty string when the guide does not know it.
    #[must_use]
    pub fn formatted_air_date(&self) -> String {
        self.original_air_date
            .map(|date| date.format(AIR_DATE_FORMAT).to_string())
            .unwrap_or_default()
    }

    /// Returns the recording start time for the list's `time` column.
    #[must_use]
    pub fn formatted_start_time(&self) -> String {
        self.start_time.format(START_TIME_FORMAT).to_string()
    }
}
