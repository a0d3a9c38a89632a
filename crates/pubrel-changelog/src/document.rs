//! In-memory changelog document

use pubrel_core::text::{normalize_document, split_lines};
use pubrel_core::ReleaseMode;
use tracing::{debug, instrument};

use crate::parser::classify;
use crate::types::{ChangelogUpdate, LineKind, Section, VersionHeader};

/// A changelog held as raw lines.
///
/// Lines are classified on demand, so edits never leave a stale
/// classification behind. [`Changelog::render`] joins the lines back exactly
/// as they were read; [`Changelog::to_normalized_string`] additionally
/// collapses blank runs and fixes the trailing newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changelog {
    lines: Vec<String>,
}

impl Changelog {
    /// Parse changelog text
    pub fn parse(text: &str) -> Self {
        Self {
            lines: split_lines(text),
        }
    }

    /// Minimal changelog used when a package has none yet
    pub fn for_package(package: &str) -> Self {
        Self::parse(&format!("# {} CHANGELOG\n\n", package))
    }

    /// Raw lines
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Classified lines
    pub fn classified(&self) -> impl Iterator<Item = (usize, LineKind)> + '_ {
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| (i, classify(line)))
    }

    /// Version sections in document order
    pub fn sections(&self) -> Vec<Section> {
        let headings: Vec<(usize, LineKind)> = self
            .classified()
            .filter(|(_, kind)| kind.is_subheading())
            .collect();

        headings
            .iter()
            .enumerate()
            .filter_map(|(n, (line, kind))| {
                let LineKind::VersionHeader(header) = kind else {
                    return None;
                };
                let end = headings
                    .get(n + 1)
                    .map(|(next, _)| *next)
                    .unwrap_or(self.lines.len());
                Some(Section {
                    header: header.clone(),
                    line: *line,
                    body: line + 1..end,
                })
            })
            .collect()
    }

    /// The topmost version section header, by document order
    pub fn current_version(&self) -> Option<VersionHeader> {
        self.classified().find_map(|(_, kind)| match kind {
            LineKind::VersionHeader(header) => Some(header),
            _ => None,
        })
    }

    /// Whether a header for `version` exists, with or without the marker
    pub fn has_version(&self, version: &str) -> bool {
        self.sections().iter().any(|s| s.header.version == version)
    }

    /// Ensure a section header for `version` exists.
    ///
    /// A missing section is inserted as the first section: after the title
    /// line and any blank lines that follow it, or at the start of the
    /// document when there is no title. Returns true if a header was added.
    pub fn ensure_version_section(&mut self, version: &str, mode: ReleaseMode) -> bool {
        if self.has_version(version) {
            debug!(version, "changelog section already present");
            return false;
        }

        let mut index = self
            .classified()
            .find(|(_, kind)| *kind == LineKind::Title)
            .map(|(i, _)| i + 1)
            .unwrap_or(0);
        while index < self.lines.len() && self.lines[index].trim().is_empty() {
            index += 1;
        }

        let header = VersionHeader::new(version, !mode.is_release());
        debug!(header = %header.render(), index, "inserting changelog section");
        self.lines
            .splice(index..index, [String::new(), header.render(), String::new()]);
        true
    }

    /// Remove the development marker from the header of `version`.
    ///
    /// Only the marker is dropped; any text after the version is kept.
    /// Returns true if a header changed.
    pub fn strip_development_marker(&mut self, version: &str) -> bool {
        let targets: Vec<(usize, VersionHeader)> = self
            .sections()
            .into_iter()
            .filter(|s| s.header.development && s.header.version == version)
            .map(|s| (s.line, s.header))
            .collect();

        for (line, mut header) in targets.iter().cloned() {
            header.development = false;
            debug!(line, header = %header.render(), "removing development marker");
            self.lines[line] = header.render();
        }

        !targets.is_empty()
    }

    /// Add `- <message>` as the first entry of a section.
    ///
    /// With a `target`, the section is the last whose header matches it
    /// (the header may add the development marker to the target). Without
    /// one, the topmost version section is used. Returns false and leaves the
    /// document untouched when no section matches.
    pub fn append_message(&mut self, message: &str, target: Option<&str>) -> bool {
        let sections = self.sections();
        let section = match target {
            Some(target) => sections.into_iter().rev().find(|s| s.header.matches(target)),
            None => sections.into_iter().next(),
        };

        let Some(section) = section else {
            debug!(target = ?target, "no changelog section matches, message not added");
            return false;
        };

        let mut index = section.line + 1;
        while index < self.lines.len() && self.lines[index].trim().is_empty() {
            index += 1;
        }

        let before_heading = self
            .lines
            .get(index)
            .is_some_and(|line| line.starts_with('#'));

        let mut entry = vec![format!("- {}", message)];
        if before_heading {
            entry.push(String::new());
        }
        self.lines.splice(index..index, entry);
        true
    }

    /// Apply the full version workflow to this changelog.
    ///
    /// Ensures the section for `version`, strips its marker in release mode
    /// and adds `message` to it when given.
    #[instrument(skip(self, message), fields(has_message = message.is_some()))]
    pub fn apply(
        &mut self,
        version: &str,
        mode: ReleaseMode,
        message: Option<&str>,
    ) -> ChangelogUpdate {
        let mut update = ChangelogUpdate {
            section_created: self.ensure_version_section(version, mode),
            ..ChangelogUpdate::default()
        };

        if mode.is_release() {
            update.marker_stripped = self.strip_development_marker(version);
        }

        if let Some(message) = message {
            let target = mode.section_label(version);
            update.message_added = self.append_message(message, Some(&target));
        }

        update
    }

    /// Join the lines back into text, unchanged
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    /// Render with blank runs collapsed and a single trailing newline
    pub fn to_normalized_string(&self) -> String {
        normalize_document(&self.render())
    }
}

impl std::fmt::Display for Changelog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}
