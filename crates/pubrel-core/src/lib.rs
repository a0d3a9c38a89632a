//! pubrel Core - Core library for release bookkeeping
//!
//! This crate provides the foundational types, error handling, configuration
//! and text normalization shared by the manifest and changelog rewriters and
//! the release workflows.

pub mod config;
pub mod error;
pub mod text;
pub mod types;

pub use error::{PubrelError, Result};
pub use types::{parse_version, PackageRegistry, ReleaseMode, Selection, DEVELOPMENT_MARKER};
