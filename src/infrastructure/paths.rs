//! Path manipulation utilities.
//!
//! This module resolves the data directory, expands `~` in configured paths
//! and turns recording ids and titles into safe file names for the artwork
//! caches.

use std::path::PathBuf;

/// Returns the data directory for reclist storage.
///
/// The directory is `~/.local/share/reclist`. Settings, the thumbnail cache
/// and the log file live inside it. Falls back to a relative
/// `.local/share/reclist` when `HOME` is unset.
///
/// # Examples
///
/// ```
/// use reclist::infrastructure::get_data_dir;
///
/// let data_dir = get_data_dir();
/// assert!(data_dir.ends_with(".local/share/reclist"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    home_dir()
        .unwrap_or_default()
        .join(".local")
        .join("share")
        .join("reclist")
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde are returned unchanged, as are tilde paths
/// when `HOME` is unset.
///
/// # Examples
///
/// ```
/// use reclist::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let Some(home) = home_dir() else {
        return path.to_string();
    };
    let home = home.to_string_lossy();

    if let Some(rest) = path.strip_prefix("~/") {
        format!("{home}/{rest}")
    } else if path == "~" {
        home.into_owned()
    } else {
        path.to_string()
    }
}

/// Turns arbitrary text into a single path component.
///
/// Path separators, control characters and characters Windows rejects become
/// `_`. Leading and trailing dots and spaces are trimmed. An empty result
/// becomes `_`.
///
/// # Examples
///
/// ```
/// use reclist::infrastructure::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("Law & Order: SVU"), "Law & Order_ SVU");
/// assert_eq!(sanitize_file_name("../etc"), "_etc");
/// ```
#[must_use]
pub fn sanitize_file_name(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = replaced.trim_matches(|c| c == '.' || c == ' ');

    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}
