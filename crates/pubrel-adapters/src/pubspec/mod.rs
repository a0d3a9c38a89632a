//! pubspec.yaml manifest support
//!
//! The manifest is edited line by line rather than through a YAML
//! serializer so comments, ordering and formatting survive a rewrite.

mod document;
mod line;

pub use document::{DependencyMode, PubspecDocument};
pub use line::ManifestLine;

use pubrel_core::ReleaseMode;
use tracing::{debug, instrument};

/// Rewrite a manifest for `version` in `mode`.
///
/// Sets the top-level version, switches local package references between
/// pinned versions (release) and `path:` links (development), applies the
/// publish gate for the mode, separates the sections that follow the
/// dependency block and normalizes blank lines and the trailing newline.
#[instrument(skip(text, local_packages), fields(len = text.len()))]
pub fn rewrite<S: AsRef<str>>(
    text: &str,
    version: &str,
    mode: ReleaseMode,
    local_packages: &[S],
) -> String {
    let mut doc = PubspecDocument::parse(text);
    let version_changed = doc.set_version(version);
    let dependencies_changed = doc.rewrite_dependencies(version, mode, local_packages);
    let gate_changed = doc.apply_publish_gate(mode);
    doc.separate_sections();
    debug!(
        version_changed,
        dependencies_changed, gate_changed, "manifest rewritten"
    );
    doc.to_normalized_string()
}
