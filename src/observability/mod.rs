//! File-based logging.
//!
//! `tracing` events and spans are formatted by `tracing_subscriber::fmt` and
//! written to a size-rotated log file in the data directory.
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → FileWriter → <data_dir>/reclist.log
//! ```
//!
//! # Configuration
//!
//! The level comes from:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` in [`Config`](crate::Config)
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`file_writer`]: Rotating file writer (10 MB, 3 backups)

pub mod file_writer;
mod init;

pub use file_writer::FileWriter;
pub use init::{init_tracing, LOG_FILE_NAME};
