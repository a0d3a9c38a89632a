//! Changelog types

use std::ops::Range;

use pubrel_core::DEVELOPMENT_MARKER;
use serde::{Deserialize, Serialize};

/// A `## <version>` section header, optionally carrying the development marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionHeader {
    /// Version without the development marker
    pub version: String,
    /// Whether the header carries the development marker
    pub development: bool,
    /// Text after the version token (e.g. a release date), including its
    /// leading whitespace
    pub suffix: String,
}

impl VersionHeader {
    /// Create a header for `version`
    pub fn new(version: impl Into<String>, development: bool) -> Self {
        Self {
            version: version.into(),
            development,
            suffix: String::new(),
        }
    }

    /// Version as written in the header, marker included
    pub fn label(&self) -> String {
        if self.development {
            format!("{}{}", self.version, DEVELOPMENT_MARKER)
        } else {
            self.version.clone()
        }
    }

    /// Check whether this header belongs to `target`, which may itself carry
    /// the development marker. The header may add the marker to the target.
    pub fn matches(&self, target: &str) -> bool {
        let label = self.label();
        label == target
            || label
                .strip_suffix(DEVELOPMENT_MARKER)
                .is_some_and(|base| base == target)
    }

    /// Render the header line
    pub fn render(&self) -> String {
        format!("## {}{}", self.label(), self.suffix)
    }
}

impl std::fmt::Display for VersionHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classification of a single changelog line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Level-1 title (`# ...`)
    Title,
    /// Level-2 header holding a semantic version
    VersionHeader(VersionHeader),
    /// Any other heading (`## Unreleased`, `### Fixes`, ...)
    Heading,
    /// `- entry` or `* entry`
    Bullet,
    /// Empty or whitespace-only line
    Blank,
    /// Free text
    Text,
}

impl LineKind {
    /// Whether the line is a heading of level 2 or deeper
    pub fn is_subheading(&self) -> bool {
        matches!(self, Self::VersionHeader(_) | Self::Heading)
    }
}

/// A version section: its header and the lines that follow it up to the next
/// heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Parsed header
    pub header: VersionHeader,
    /// Line index of the header
    pub line: usize,
    /// Line indices of the section body
    pub body: Range<usize>,
}

impl Section {
    /// Number of bullet entries in the section
    pub fn entry_count(&self, lines: &[String]) -> usize {
        lines[self.body.clone()]
            .iter()
            .filter(|l| crate::parser::classify(l) == LineKind::Bullet)
            .count()
    }
}

/// Edits applied by [`crate::Changelog::apply`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogUpdate {
    /// A new section header was inserted
    pub section_created: bool,
    /// The development marker was removed from the section header
    pub marker_stripped: bool,
    /// The message was added as a bullet
    pub message_added: bool,
}

impl ChangelogUpdate {
    /// Whether anything was changed
    pub fn changed(&self) -> bool {
        self.section_created || self.marker_stripped || self.message_added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_label_and_render() {
        let header = VersionHeader::new("1.2.0", true);
        assert_eq!(header.label(), "1.2.0-WIP");
        assert_eq!(header.render(), "## 1.2.0-WIP");

        let released = VersionHeader {
            suffix: " - 2024-05-01".to_string(),
            ..VersionHeader::new("1.2.0", false)
        };
        assert_eq!(released.render(), "## 1.2.0 - 2024-05-01");
    }

    #[test]
    fn test_header_matches_target() {
        let dev = VersionHeader::new("1.2.0", true);
        assert!(dev.matches("1.2.0"));
        assert!(dev.matches("1.2.0-WIP"));
        assert!(!dev.matches("1.2"));

        let release = VersionHeader::new("1.2.0", false);
        assert!(release.matches("1.2.0"));
        assert!(!release.matches("1.2.0-WIP"));
    }
}
