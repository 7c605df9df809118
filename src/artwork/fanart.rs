//! Fan-art poster lookup.
//!
//! Posters are plain image files grouped by series title:
//! `<fanart_dir>/<sanitized title>/*.{jpg,jpeg,png,gif}`. When a series has
//! several posters one is picked at random on every lookup.

use crate::domain::Program;
use crate::infrastructure::sanitize_file_name;
use rand::Rng;
use std::path::{Path, PathBuf};

/// File extensions treated as poster images.
const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Supplies optional poster art for a program.
pub trait FanartSource: Send + Sync {
    /// Returns a poster for the program's series, if one is known.
    fn random_poster(&self, program: &Program) -> Option<PathBuf>;
}

/// Fan-art stored as per-title directories.
#[derive(Debug, Clone)]
pub struct DirectoryFanart {
    root: PathBuf,
}

impl DirectoryFanart {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn posters_for(&self, title: &str) -> Vec<PathBuf> {
        let dir = self.root.join(sanitize_file_name(title));
        let Ok(entries) = std::fs::read_dir(&dir) else {
            return Vec::new();
        };

        let mut posters: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_image(path))
            .collect();
        posters.sort();
        posters
    }
}

impl FanartSource for DirectoryFanart {
    fn random_poster(&self, program: &Program) -> Option<PathBuf> {
        let mut posters = self.posters_for(&program.title);
        if posters.is_empty() {
            return None;
        }
        let pick = rand::rng().random_range(0..posters.len());
        tracing::trace!(title = %program.title, choices = posters.len(), "fanart poster picked");
        Some(posters.swap_remove(pick))
    }
}

/// Fan-art source that never has a poster.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFanart;

impl FanartSource for NoFanart {
    fn random_poster(&self, _program: &Program) -> Option<PathBuf> {
        None
    }
}

fn is_image(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                IMAGE_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn program(title: &str) -> Program {
        Program::new("1", title, Utc.with_ymd_and_hms(2020, 1, 1, 20, 0, 0).unwrap())
    }

    #[test]
    fn picks_one_of_the_series_posters() {
        let dir = tempfile::tempdir().unwrap();
        let series = dir.path().join("Law & Order_ SVU");
        std::fs::create_dir_all(&series).unwrap();
        std::fs::write(series.join("a.jpg"), b"").unwrap();
        std::fs::write(series.join("b.PNG"), b"").unwrap();
        std::fs::write(series.join("notes.txt"), b"").unwrap();

        let fanart = DirectoryFanart::new(dir.path());
        for _ in 0..10 {
            let poster = fanart.random_poster(&program("Law & Order: SVU")).unwrap();
            let name = poster.file_name().unwrap().to_string_lossy().into_owned();
            assert!(name == "a.jpg" || name == "b.PNG", "unexpected {name}");
        }
    }

    #[test]
    fn unknown_series_has_no_poster() {
        let dir = tempfile::tempdir().unwrap();
        let fanart = DirectoryFanart::new(dir.path());
        assert!(fanart.random_poster(&program("Nova")).is_none());
        assert!(NoFanart.random_poster(&program("Nova")).is_none());
    }
}
