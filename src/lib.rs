//! reclist: a recorded-programs screen with incremental rendering and
//! background artwork loading.
//!
//! reclist drives the "recorded TV" list of a media center:
//! - Fetches recordings from a data source and sorts them by date, title or
//!   original air date, in either direction
//! - Rebuilds the list in timed phases and removes deleted recordings without
//!   a full rebuild
//! - Warms a thumbnail cache and fills in row posters on background threads,
//!   coalesced and cancellable
//! - Persists sort order, direction and selection between visits

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Terminal front-end (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - ScreenController and click dispatch              │
//! │  - ProgramListModel, sort keys                      │
//! │  - IncrementalRenderer, middleware                  │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Storage Layer │   │ Worker Layer  │
//! │ (ui/)         │   │ (storage/)    │   │ (worker/)     │
//! │ - UiHandle    │   │ - Recordings  │   │ - Precacher   │
//! │ - MemoryList  │   │ - Settings    │   │ - Posters     │
//! │ - Terminal    │   │               │   │ - Spawners    │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Artwork, Infrastructure & Domain Layers            │
//! │  - Thumbnail cache, fan-art (artwork/)              │
//! │  - Paths (infrastructure/)                          │
//! │  - Program, errors (domain/)                        │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing-subscriber fmt layer, rotating log file  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```toml
//! # ~/.config/reclist/config.toml
//! recordings_file = "~/tv/recordings.json"
//! data_dir = "~/.local/share/reclist"
//! fanart_dir = "~/tv/fanart"
//! theme = "catppuccin-mocha"
//! trace_level = "debug"
//! background = true
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use reclist::app::{DetailsContext, DetailsOutcome, DetailsView, CyclingBidiIterator};
//! use reclist::ui::MemoryList;
//! use reclist::{build_services, Config, Program, ScreenController};
//! use std::sync::Arc;
//!
//! struct NoDetails;
//!
//! impl DetailsView for NoDetails {
//!     fn show(
//!         &mut self,
//!         _programs: &mut CyclingBidiIterator<Arc<Program>>,
//!         _context: &DetailsContext,
//!     ) -> reclist::Result<DetailsOutcome> {
//!         Ok(DetailsOutcome::default())
//!     }
//! }
//!
//! let config = Config::default();
//! let list = Arc::new(MemoryList::new());
//! let services = build_services(&config, list.clone(), Box::new(NoDetails))?;
//! let mut screen = ScreenController::new(services);
//! screen.on_init();
//! # Ok::<(), reclist::RecListError>(())
//! ```

pub mod app;
pub mod artwork;
pub mod domain;
pub mod infrastructure;
pub mod storage;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{ScreenController, ScreenServices, ScreenState, SortKey};
pub use domain::{Program, RecListError, Result};
pub use ui::Theme;

use app::{DetailsView, Timing};
use artwork::{DirectoryFanart, FanartSource, FileThumbnailCache, NoFanart};
use infrastructure::{expand_tilde, get_data_dir};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storage::{JsonRecordingSource, JsonSettings};
use ui::UiHandle;
use worker::{InlineSpawner, TaskSpawner, ThreadSpawner};

/// File name of the settings store inside the data directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Directory of the thumbnail cache inside the data directory.
pub const THUMBNAIL_DIR_NAME: &str = "thumbnails";

/// Front-end configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Recordings file read by the JSON data source.
    ///
    /// Default: `<data_dir>/recordings.json`
    pub recordings_file: PathBuf,

    /// Directory holding settings, the thumbnail cache and the log file.
    ///
    /// Default: `~/.local/share/reclist`
    pub data_dir: PathBuf,

    /// Root of the per-series fan-art directories. No fan-art when unset.
    pub fanart_dir: Option<PathBuf>,

    /// Built-in theme name. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file. See [`ui::theme`] for format.
    pub theme_file: Option<PathBuf>,

    /// Log level: `trace`, `debug`, `info`, `warn` or `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Run the precacher and poster filler on background threads.
    ///
    /// When `false` they run inline on the interactive thread. Default: `true`
    pub background: bool,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = get_data_dir();
        Self {
            recordings_file: data_dir.join("recordings.json"),
            data_dir,
            fanart_dir: None,
            theme_name: None,
            theme_file: None,
            trace_level: None,
            background: true,
        }
    }
}

/// On-disk shape of the configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    recordings_file: Option<String>,
    data_dir: Option<String>,
    fanart_dir: Option<String>,
    theme: Option<String>,
    theme_file: Option<String>,
    trace_level: Option<String>,
    background: Option<bool>,
}

impl ConfigFile {
    fn into_map(self) -> BTreeMap<String, String> {
        [
            ("recordings_file", self.recordings_file),
            ("data_dir", self.data_dir),
            ("fanart_dir", self.fanart_dir),
            ("theme", self.theme),
            ("theme_file", self.theme_file),
            ("trace_level", self.trace_level),
            ("background", self.background.map(|b| b.to_string())),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
        .collect()
    }
}

impl Config {
    /// Parses configuration from a string map.
    ///
    /// # Parsing Rules
    ///
    /// - Paths have a leading `~` expanded; blank values count as unset
    /// - `recordings_file` defaults to `<data_dir>/recordings.json`
    /// - `background`: `true`/`false` in any casing, else the default
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use std::path::PathBuf;
    /// use reclist::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("data_dir".to_string(), "/srv/reclist".to_string());
    /// map.insert("background".to_string(), "false".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.recordings_file, PathBuf::from("/srv/reclist/recordings.json"));
    /// assert!(!config.background);
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let text = |key: &str| {
            config
                .get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
        };
        let path = |key: &str| text(key).map(|value| PathBuf::from(expand_tilde(value)));

        let data_dir = path("data_dir").unwrap_or_else(get_data_dir);
        let recordings_file = path("recordings_file").unwrap_or_else(|| data_dir.join("recordings.json"));
        let background = text("background")
            .and_then(storage::settings::parse_bool)
            .unwrap_or(true);

        Self {
            recordings_file,
            data_dir,
            fanart_dir: path("fanart_dir"),
            theme_name: text("theme").map(String::from),
            theme_file: path("theme_file"),
            trace_level: text("trace_level").map(String::from),
            background,
        }
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`RecListError::Config`] if the file cannot be read, is not
    /// valid TOML or contains unknown keys.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_map(&Self::read_map(path)?))
    }

    /// Reads a TOML configuration file into the string map accepted by
    /// [`from_map`](Self::from_map), so callers can layer overrides on top.
    ///
    /// # Errors
    ///
    /// Same as [`from_file`](Self::from_file).
    pub fn read_map(path: impl AsRef<Path>) -> Result<BTreeMap<String, String>> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            RecListError::Config(format!("failed to read config {}: {e}", path.display()))
        })?;
        let file: ConfigFile = toml::from_str(&contents)
            .map_err(|e| RecListError::Config(format!("failed to parse config TOML: {e}")))?;

        Ok(file.into_map())
    }

    /// Settings store location.
    #[must_use]
    pub fn settings_file(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE_NAME)
    }

    /// Thumbnail cache location.
    #[must_use]
    pub fn thumbnail_dir(&self) -> PathBuf {
        self.data_dir.join(THUMBNAIL_DIR_NAME)
    }
}

/// Resolves the theme: `theme_file`, then `theme_name`, then the default.
///
/// Failures fall back to the default theme and are logged.
#[must_use]
pub fn load_theme(config: &Config) -> Theme {
    config.theme_file.as_ref().map_or_else(
        || {
            config.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
                Theme::from_name(theme_name).unwrap_or_else(|| {
                    tracing::warn!(theme_name = %theme_name, "unknown theme, using default");
                    Theme::default()
                })
            })
        },
        |theme_file| {
            Theme::from_file(theme_file).unwrap_or_else(|e| {
                tracing::warn!(theme_file = ?theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            })
        },
    )
}

/// Builds the production collaborators for a [`ScreenController`].
///
/// # Errors
///
/// Returns an error if the settings store cannot be opened.
pub fn build_services(
    config: &Config,
    ui: Arc<dyn UiHandle>,
    details: Box<dyn DetailsView>,
) -> Result<ScreenServices> {
    tracing::debug!(
        recordings = ?config.recordings_file,
        data_dir = ?config.data_dir,
        background = config.background,
        "building screen services"
    );

    let fanart: Arc<dyn FanartSource> = match &config.fanart_dir {
        Some(dir) => Arc::new(DirectoryFanart::new(dir)),
        None => Arc::new(NoFanart),
    };
    let spawner: Arc<dyn TaskSpawner> = if config.background {
        Arc::new(ThreadSpawner)
    } else {
        Arc::new(InlineSpawner)
    };

    Ok(ScreenServices {
        ui,
        source: Arc::new(JsonRecordingSource::new(&config.recordings_file)),
        settings: Box::new(JsonSettings::open(config.settings_file())?),
        thumbnails: Arc::new(FileThumbnailCache::new(config.thumbnail_dir())),
        fanart,
        details,
        spawner,
        timing: Timing::Traced,
    })
}
