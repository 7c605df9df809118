//! Persistent key-value settings.
//!
//! The screen restores its sort order, direction, recording group and last
//! selection from a [`SettingsStore`] when it is created and writes them back
//! when the user leaves. Values are strings; booleans are stored as
//! `"true"`/`"false"`.

use crate::domain::{RecListError, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

/// Last selected row position (integer string).
pub const KEY_LAST_SELECTED: &str = "recordings_last_selected";

/// Active sort key name.
pub const KEY_SORT_BY: &str = "recordings_sort_by";

/// Sort direction, `"true"` or `"false"`.
pub const KEY_SORT_ASCENDING: &str = "recordings_sort_ascending";

/// Recording group. Persisted but not yet used for filtering.
pub const KEY_RECORDING_GROUP: &str = "recordings_recording_group";

/// Values used when a key was never written.
const DEFAULTS: [(&str, &str); 4] = [
    (KEY_LAST_SELECTED, "0"),
    (KEY_SORT_BY, "Date"),
    (KEY_SORT_ASCENDING, "true"),
    (KEY_RECORDING_GROUP, "Default"),
];

/// Returns the default for `key`, or an empty string for unknown keys.
#[must_use]
pub fn default_value(key: &str) -> &'static str {
    DEFAULTS
        .iter()
        .find(|(name, _)| *name == key)
        .map_or("", |(_, value)| value)
}

/// Parses a stored boolean. Accepts any casing of `true`/`false`.
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Durable settings used by the screen.
pub trait SettingsStore: Send {
    /// Returns the stored value, or the key's default.
    fn get(&self, key: &str) -> String;

    /// Returns the stored value as a boolean, falling back to the key's
    /// default when the value is not a boolean.
    fn get_bool(&self, key: &str) -> bool {
        parse_bool(&self.get(key))
            .or_else(|| parse_bool(default_value(key)))
            .unwrap_or(false)
    }

    /// Stores a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    fn put(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Settings held in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: BTreeMap<String, String>,
}

impl MemorySettings {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `values`.
    #[must_use]
    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> String {
        self.values
            .get(key)
            .cloned()
            .unwrap_or_else(|| default_value(key).to_string())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Settings persisted as a flat JSON object.
///
/// Every `put` rewrites the file atomically (write-to-temp + rename).
#[derive(Debug)]
pub struct JsonSettings {
    file_path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonSettings {
    /// Opens the settings file, creating parent directories as needed.
    ///
    /// A missing file starts empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the file
    /// exists but is not a JSON object of strings.
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self> {
        let file_path = file_path.into();
        tracing::debug!(path = ?file_path, "opening settings");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let values = if file_path.exists() {
            let contents = std::fs::read_to_string(&file_path)?;
            serde_json::from_str(&contents)
                .map_err(|e| RecListError::Settings(format!("failed to parse settings JSON: {e}")))?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            file_path,
            values: Mutex::new(values),
        })
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.values.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn save_to_file(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(values)
            .map_err(|e| RecListError::Settings(format!("failed to serialize settings: {e}")))?;
        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;
        Ok(())
    }
}

impl SettingsStore for JsonSettings {
    fn get(&self, key: &str) -> String {
        self.lock()
            .get(key)
            .cloned()
            .unwrap_or_else(|| default_value(key).to_string())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        let mut values = self.lock();
        values.insert(key.to_string(), value.to_string());
        self.save_to_file(&values)?;
        tracing::trace!(key = key, "setting saved");
        Ok(())
    }
}
