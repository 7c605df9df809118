//! Domain layer for the recordings screen.
//!
//! This module contains the core domain types, independent of any host GUI
//! runtime or storage backend.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`program`]: Recorded program model and display formatting
//!
//! # Examples
//!
//! ```
//! use chrono::Utc;
//! use reclist::domain::{Program, Result};
//!
//! fn latest() -> Result<Program> {
//!     Ok(Program::new("1051_20200101200000", "Nova", Utc::now()))
//! }
//! ```

pub mod error;
pub mod program;

pub use error::{RecListError, Result};
pub use program::Program;
