//! Tracing initialization and subscriber setup.

use super::file_writer::FileWriter;
use crate::Config;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name of the log file inside the data directory.
pub const LOG_FILE_NAME: &str = "reclist.log";

/// Initializes the tracing subscriber with a rotating log file.
///
/// Installs a registry with:
/// 1. An [`EnvFilter`] taken from `RUST_LOG` when set, else from
///    `config.trace_level`, else `info`
/// 2. A `fmt` layer writing plain text to `<data_dir>/reclist.log`
///
/// Logging is optional: if the data directory cannot be created nothing is
/// installed. Only the first call in a process takes effect.
///
/// # Example
///
/// ```rust,no_run
/// use reclist::observability::init_tracing;
/// use reclist::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config
        .trace_level
        .clone()
        .unwrap_or_else(|| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if std::fs::create_dir_all(&config.data_dir).is_err() {
        return;
    }

    let writer = Arc::new(FileWriter::new(config.data_dir.join(LOG_FILE_NAME)));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_thread_names(true)
        .with_target(true)
        .with_writer(writer);

    let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);

    let _ = subscriber.try_init();
}
