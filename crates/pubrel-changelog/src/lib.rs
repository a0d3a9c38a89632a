//! pubrel Changelog - Changelog section rewriting
//!
//! A changelog is a title line followed by `## <version>` sections holding
//! `- ` bullet entries. Sections still in development carry a `-WIP` marker.
//! This crate classifies changelog lines, derives section records from them
//! and applies the version/message edits used by the release workflows.

pub mod document;
pub mod parser;
pub mod rewriter;
pub mod types;

pub use document::Changelog;
pub use rewriter::{
    append_message, current_version, ensure_version_section, process, strip_development_marker,
};
pub use types::{ChangelogUpdate, LineKind, Section, VersionHeader};
