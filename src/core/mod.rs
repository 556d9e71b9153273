//! Core types shared across the crate.
//!
//! Currently this is the error taxonomy; see [`error`] for the full mapping
//! of install-pipeline stages onto typed failures.

pub mod error;

pub use error::{FxpmError, display_error};
