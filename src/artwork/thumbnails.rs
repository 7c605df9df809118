//! Thumbnail cache.
//!
//! Backend preview images are copied into a local cache directory the first
//! time they are requested. Later requests for the same recording return the
//! cached file without touching the source. The precacher warms this cache in
//! the background; the poster filler and the details view read from it.

use crate::domain::{Program, RecListError, Result};
use crate::infrastructure::sanitize_file_name;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Resolves a program to a local thumbnail image.
pub trait ThumbnailCache: Send + Sync {
    /// Returns the path of the cached thumbnail, fetching it if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`RecListError::Thumbnail`] when the program has no preview or
    /// the preview cannot be copied into the cache.
    fn get(&self, program: &Program) -> Result<PathBuf>;
}

/// Thumbnail cache stored in a directory on disk.
///
/// Cached files are named `<sanitized recording id>.<source extension>`.
/// Previews are copied to a temporary sibling and renamed into place, so a
/// cached name only ever refers to a complete copy.
#[derive(Debug, Clone)]
pub struct FileThumbnailCache {
    dir: PathBuf,
}

impl FileThumbnailCache {
    /// Creates a cache rooted at `dir`. The directory is created lazily.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the cache directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn cached_path(&self, program: &Program, source: &Path) -> PathBuf {
        let mut name = sanitize_file_name(&program.recording_id);
        if let Some(ext) = source.extension() {
            name.push('.');
            name.push_str(&ext.to_string_lossy());
        }
        self.dir.join(name)
    }

    /// Sibling of `cached` that only this call writes to. The file becomes
    /// visible under its cached name through a rename, never half-copied.
    fn temp_path(&self, cached: &Path) -> PathBuf {
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let mut name = cached.file_name().unwrap_or_default().to_os_string();
        name.push(format!(".{}-{seq}.tmp", std::process::id()));
        self.dir.join(name)
    }
}

impl ThumbnailCache for FileThumbnailCache {
    fn get(&self, program: &Program) -> Result<PathBuf> {
        let source = program.thumbnail_source.as_deref().ok_or_else(|| {
            RecListError::Thumbnail(format!("no preview for {}", program.recording_id))
        })?;

        let cached = self.cached_path(program, source);
        if cached.exists() {
            tracing::trace!(recording_id = %program.recording_id, "thumbnail cache hit");
            return Ok(cached);
        }

        std::fs::create_dir_all(&self.dir).map_err(|e| {
            RecListError::Thumbnail(format!("cannot create {}: {e}", self.dir.display()))
        })?;
        let tmp_path = self.temp_path(&cached);
        let copied =
            std::fs::copy(source, &tmp_path).and_then(|_| std::fs::rename(&tmp_path, &cached));
        if let Err(e) = copied {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(RecListError::Thumbnail(format!(
                "cannot copy preview {} for {}: {e}",
                source.display(),
                program.recording_id
            )));
        }

        tracing::debug!(
            recording_id = %program.recording_id,
            path = ?cached,
            "thumbnail cached"
        );
        Ok(cached)
    }
}
