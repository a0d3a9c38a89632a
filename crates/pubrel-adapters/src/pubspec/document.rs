//! In-memory pubspec document

use std::ops::Range;
use std::path::Path;

use pubrel_core::error::{ManifestError, Result};
use pubrel_core::text::{normalize_document, split_lines};
use pubrel_core::ReleaseMode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::line::{scalar, ManifestLine};

/// Top-level key of the dependency block
const DEPENDENCIES_KEY: &str = "dependencies";

/// Top-level key of the publish gate
const PUBLISH_GATE_KEY: &str = "publish_to";

/// Value of the publish gate that blocks publishing
const PUBLISH_GATE_VALUE: &str = "none";

/// Sections that get a blank line before them when they follow the
/// dependency block
const SEPARATED_SECTIONS: &[&str] = &["dev_dependencies", "flutter"];

/// How local packages are referenced from the dependency block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyMode {
    /// No local package is referenced
    None,
    /// Every local reference is a `path:` link
    Path,
    /// Every local reference is a pinned version
    Pinned,
    /// Both forms are present
    Mixed,
}

impl DependencyMode {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Path => "path",
            Self::Pinned => "pinned",
            Self::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for DependencyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the dependency walk currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DependencyState<'a> {
    NoActiveLocal,
    ActiveLocal(&'a str),
}

/// A `pubspec.yaml` held as raw lines.
///
/// Only the handful of fields the release workflows touch are understood;
/// every other line is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubspecDocument {
    lines: Vec<String>,
}

impl PubspecDocument {
    /// Parse manifest text
    pub fn parse(text: &str) -> Self {
        Self {
            lines: split_lines(text),
        }
    }

    /// Load a manifest from disk
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ManifestError::NotFound(path.to_path_buf()).into());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Raw lines
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn classified(&self) -> impl Iterator<Item = (usize, ManifestLine<'_>)> + '_ {
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| (i, ManifestLine::classify(line)))
    }

    fn top_level_lines<'s>(&'s self, key: &'s str) -> impl Iterator<Item = usize> + 's {
        self.classified()
            .filter(move |(_, line)| line.top_level_key() == Some(key))
            .map(|(i, _)| i)
    }

    /// Value of the first top-level `version:` line
    pub fn version(&self) -> Option<String> {
        self.classified().find_map(|(_, line)| match line {
            ManifestLine::Key {
                indent: "",
                key: "version",
                value,
            } => Some(scalar(value).to_string()),
            _ => None,
        })
    }

    /// Replace the value of every top-level `version:` line, keeping the
    /// whitespace after the colon. Returns true if a line changed.
    pub fn set_version(&mut self, version: &str) -> bool {
        let mut changed = false;
        for index in self.top_level_lines("version").collect::<Vec<_>>() {
            let line = &self.lines[index];
            let ManifestLine::Key { value, .. } = ManifestLine::classify(line) else {
                continue;
            };
            let spacing = &value[..value.len() - value.trim_start().len()];
            let spacing = if spacing.is_empty() { " " } else { spacing };
            let updated = format!("version:{}{}", spacing, version);
            if *line != updated {
                debug!(from = %line, to = %updated, "updating manifest version");
                self.lines[index] = updated;
                changed = true;
            }
        }
        changed
    }

    /// Line range of the dependency block, header included.
    ///
    /// The block runs from the top-level `dependencies:` line up to the next
    /// top-level key or comment.
    pub fn dependency_block(&self) -> Option<Range<usize>> {
        let start = self.top_level_lines(DEPENDENCIES_KEY).next()?;
        let end = self
            .classified()
            .skip(start + 1)
            .find(|(_, line)| line.is_top_level())
            .map(|(i, _)| i)
            .unwrap_or(self.lines.len());
        Some(start..end)
    }

    /// Rewrite local package references in the dependency block.
    ///
    /// Release mode pins each local package to `version` and drops its
    /// `path:` line. Development mode turns each into a bare header followed
    /// by `path: ../<name>`. Returns true if the block changed.
    pub fn rewrite_dependencies<S: AsRef<str>>(
        &mut self,
        version: &str,
        mode: ReleaseMode,
        local_packages: &[S],
    ) -> bool {
        let Some(block) = self.dependency_block() else {
            debug!("no dependency block");
            return false;
        };

        let body = &self.lines[block.start + 1..block.end];
        let mut output = Vec::with_capacity(body.len() + 1);
        let mut state = DependencyState::NoActiveLocal;

        for (i, raw) in body.iter().enumerate() {
            let line = ManifestLine::classify(raw);

            if let DependencyState::ActiveLocal(package) = state {
                if line.is_path_to(package) {
                    if !mode.is_release() {
                        output.push(raw.clone());
                    }
                    continue;
                }
            }

            match line {
                ManifestLine::Key { indent, key, .. }
                    if local_packages.iter().any(|p| p.as_ref() == key) =>
                {
                    state = DependencyState::ActiveLocal(key);
                    if mode.is_release() {
                        output.push(format!("{}{}: {}", indent, key, version));
                    } else {
                        output.push(format!("{}{}:", indent, key));
                        let has_path = body
                            .get(i + 1)
                            .is_some_and(|next| ManifestLine::classify(next).is_path_to(key));
                        if !has_path {
                            debug!(package = key, "adding path dependency");
                            output.push(format!("{}  path: ../{}", indent, key));
                        }
                    }
                }
                ManifestLine::Key { .. } => {
                    state = DependencyState::NoActiveLocal;
                    output.push(raw.clone());
                }
                _ => output.push(raw.clone()),
            }
        }

        if output == body {
            return false;
        }
        self.lines.splice(block.start + 1..block.end, output);
        true
    }

    /// How local packages are referenced from the dependency block
    pub fn dependency_mode<S: AsRef<str>>(&self, local_packages: &[S]) -> DependencyMode {
        let Some(block) = self.dependency_block() else {
            return DependencyMode::None;
        };

        let (mut path, mut pinned) = (false, false);
        for index in block.start + 1..block.end {
            let ManifestLine::Key { key, value, .. } = ManifestLine::classify(&self.lines[index])
            else {
                continue;
            };
            if !local_packages.iter().any(|p| p.as_ref() == key) {
                continue;
            }
            let linked = self
                .lines
                .get(index + 1)
                .is_some_and(|next| ManifestLine::classify(next).is_path_to(key));
            if linked {
                path = true;
            } else if !scalar(value).is_empty() {
                pinned = true;
            }
        }

        match (path, pinned) {
            (false, false) => DependencyMode::None,
            (true, false) => DependencyMode::Path,
            (false, true) => DependencyMode::Pinned,
            (true, true) => DependencyMode::Mixed,
        }
    }

    /// Whether a top-level `publish_to: none` line is present
    pub fn has_publish_gate(&self) -> bool {
        self.classified().any(|(_, line)| is_publish_gate(&line))
    }

    /// Delete every top-level `publish_to: none` line. Returns true if one
    /// was removed.
    pub fn remove_publish_gate(&mut self) -> bool {
        let before = self.lines.len();
        self.lines
            .retain(|line| !is_publish_gate(&ManifestLine::classify(line)));
        let removed = before - self.lines.len();
        if removed > 0 {
            debug!(removed, "removed publish gate");
        }
        removed > 0
    }

    /// Ensure a top-level `publish_to: none` line.
    ///
    /// An existing `publish_to:` line is overwritten; otherwise the gate goes
    /// right after the first top-level `version:` line, or at the start of
    /// the document. Returns true if the document changed.
    pub fn set_publish_gate(&mut self) -> bool {
        let gate = format!("{}: {}", PUBLISH_GATE_KEY, PUBLISH_GATE_VALUE);
        let existing: Vec<usize> = self.top_level_lines(PUBLISH_GATE_KEY).collect();

        if !existing.is_empty() {
            let mut changed = false;
            for index in existing {
                if self.lines[index] != gate {
                    self.lines[index] = gate.clone();
                    changed = true;
                }
            }
            return changed;
        }

        let index = self
            .top_level_lines("version")
            .next()
            .map(|i| i + 1)
            .unwrap_or(0);
        debug!(index, "inserting publish gate");
        self.lines.insert(index, gate);
        true
    }

    /// Apply the gate for `mode`: set in development, removed in release
    pub fn apply_publish_gate(&mut self, mode: ReleaseMode) -> bool {
        match mode {
            ReleaseMode::Development => self.set_publish_gate(),
            ReleaseMode::Release => self.remove_publish_gate(),
        }
    }

    /// Put a blank line before `dev_dependencies:` and `flutter:` when they
    /// follow the dependency block
    pub fn separate_sections(&mut self) -> bool {
        let Some(block) = self.dependency_block() else {
            return false;
        };

        let targets: Vec<usize> = self
            .classified()
            .skip(block.end)
            .filter(|(_, line)| {
                line.top_level_key()
                    .is_some_and(|key| SEPARATED_SECTIONS.contains(&key))
            })
            .map(|(i, _)| i)
            .collect();

        let mut inserted = 0;
        for index in targets {
            let index = index + inserted;
            if !self.lines[index - 1].trim().is_empty() {
                self.lines.insert(index, String::new());
                inserted += 1;
            }
        }
        inserted > 0
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

impl std::fmt::Display for PubspecDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

fn is_publish_gate(line: &ManifestLine<'_>) -> bool {
    match line {
        ManifestLine::Key {
            indent: "",
            key,
            value,
        } => *key == PUBLISH_GATE_KEY && scalar(value) == PUBLISH_GATE_VALUE,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCALS: &[&str] = &["minigpu", "minigpu_ffi", "gpu_tensor"];

    const DEVELOPMENT: &str = "name: minigpu
version: 1.1.0
publish_to: none

environment:
  sdk: '>=3.0.0 <4.0.0'

dependencies:
  flutter:
    sdk: flutter
  minigpu_ffi:
    path: ../minigpu_ffi
  gpu_tensor:
    path: ../gpu_tensor
  ffi: ^2.1.0
dev_dependencies:
  flutter_test:
    sdk: flutter
";

    #[test]
    fn test_parse_and_render_are_lossless() {
        assert_eq!(PubspecDocument::parse(DEVELOPMENT).render(), DEVELOPMENT);
    }

    #[test]
    fn test_version() {
        let doc = PubspecDocument::parse(DEVELOPMENT);
        assert_eq!(doc.version().as_deref(), Some("1.1.0"));
        assert!(PubspecDocument::parse("name: x\n").version().is_none());
    }

    #[test]
    fn test_set_version_keeps_spacing() {
        let mut doc = PubspecDocument::parse("name: x\nversion:   1.0.0\n");
        assert!(doc.set_version("1.1.0"));
        assert_eq!(doc.render(), "name: x\nversion:   1.1.0\n");
        assert!(!doc.set_version("1.1.0"));

        let mut doc = PubspecDocument::parse("version:1.0.0\n");
        doc.set_version("2.0.0");
        assert_eq!(doc.render(), "version: 2.0.0\n");
    }

    #[test]
    fn test_set_version_ignores_nested_keys() {
        let mut doc = PubspecDocument::parse("version: 1.0.0\nplugin:\n  version: 9.9.9\n");
        doc.set_version("1.1.0");
        assert_eq!(doc.render(), "version: 1.1.0\nplugin:\n  version: 9.9.9\n");
    }

    #[test]
    fn test_dependency_block() {
        let doc = PubspecDocument::parse(DEVELOPMENT);
        let block = doc.dependency_block().unwrap();
        assert_eq!(doc.lines()[block.start], "dependencies:");
        assert_eq!(doc.lines()[block.end], "dev_dependencies:");
    }

    #[test]
    fn test_dependency_block_ends_at_comment() {
        let doc = PubspecDocument::parse("dependencies:\n  a: any\n# tooling\nother: 1\n");
        assert_eq!(doc.dependency_block(), Some(0..2));
    }

    #[test]
    fn test_release_pins_local_packages() {
        let mut doc = PubspecDocument::parse(DEVELOPMENT);
        assert!(doc.rewrite_dependencies("1.1.0", ReleaseMode::Release, LOCALS));

        let text = doc.render();
        assert!(text.contains("  minigpu_ffi: 1.1.0\n  gpu_tensor: 1.1.0\n  ffi: ^2.1.0\n"));
        assert!(!text.contains("path: ../"));
        assert!(text.contains("  flutter:\n    sdk: flutter\n"));
    }

    #[test]
    fn test_development_links_local_packages() {
        let mut doc = PubspecDocument::parse("dependencies:\n  minigpu_ffi: 1.0.0\n  ffi: ^2.1.0\n");
        assert!(doc.rewrite_dependencies("1.1.0", ReleaseMode::Development, LOCALS));
        assert_eq!(
            doc.render(),
            "dependencies:\n  minigpu_ffi:\n    path: ../minigpu_ffi\n  ffi: ^2.1.0\n"
        );
    }

    #[test]
    fn test_development_keeps_existing_path() {
        let mut doc = PubspecDocument::parse(DEVELOPMENT);
        assert!(!doc.rewrite_dependencies("1.1.0", ReleaseMode::Development, LOCALS));
        assert_eq!(doc.render(), DEVELOPMENT);
    }

    #[test]
    fn test_foreign_path_is_untouched() {
        let text = "dependencies:\n  gpu_tensor:\n    path: ../vendor/gpu_tensor\n";
        let mut doc = PubspecDocument::parse(text);
        doc.rewrite_dependencies("2.0.0", ReleaseMode::Release, LOCALS);
        assert_eq!(
            doc.render(),
            "dependencies:\n  gpu_tensor: 2.0.0\n    path: ../vendor/gpu_tensor\n"
        );
    }

    #[test]
    fn test_dev_dependencies_are_untouched() {
        let text = "dependencies:\n  ffi: any\ndev_dependencies:\n  minigpu:\n    path: ../minigpu\n";
        let mut doc = PubspecDocument::parse(text);
        assert!(!doc.rewrite_dependencies("1.0.0", ReleaseMode::Release, LOCALS));
        assert_eq!(doc.render(), text);
    }

    #[test]
    fn test_dependency_mode() {
        let doc = PubspecDocument::parse(DEVELOPMENT);
        assert_eq!(doc.dependency_mode(LOCALS), DependencyMode::Path);

        let doc = PubspecDocument::parse("dependencies:\n  minigpu: 1.0.0\n");
        assert_eq!(doc.dependency_mode(LOCALS), DependencyMode::Pinned);

        let doc = PubspecDocument::parse(
            "dependencies:\n  minigpu: 1.0.0\n  gpu_tensor:\n    path: ../gpu_tensor\n",
        );
        assert_eq!(doc.dependency_mode(LOCALS), DependencyMode::Mixed);

        let doc = PubspecDocument::parse("dependencies:\n  ffi: any\n");
        assert_eq!(doc.dependency_mode(LOCALS), DependencyMode::None);
    }

    #[test]
    fn test_publish_gate() {
        let mut doc = PubspecDocument::parse(DEVELOPMENT);
        assert!(doc.has_publish_gate());
        assert!(doc.remove_publish_gate());
        assert!(!doc.has_publish_gate());
        assert!(!doc.remove_publish_gate());
    }

    #[test]
    fn test_set_publish_gate_after_version() {
        let mut doc = PubspecDocument::parse("name: x\nversion: 1.0.0\ndescription: y\n");
        assert!(doc.set_publish_gate());
        assert_eq!(
            doc.render(),
            "name: x\nversion: 1.0.0\npublish_to: none\ndescription: y\n"
        );
        assert!(!doc.set_publish_gate());
    }

    #[test]
    fn test_set_publish_gate_overwrites_target() {
        let mut doc = PubspecDocument::parse("name: x\npublish_to: https://pub.example.com\n");
        assert!(doc.set_publish_gate());
        assert_eq!(doc.render(), "name: x\npublish_to: none\n");
    }

    #[test]
    fn test_set_publish_gate_without_version() {
        let mut doc = PubspecDocument::parse("name: x\n");
        doc.set_publish_gate();
        assert_eq!(doc.render(), "publish_to: none\nname: x\n");
    }

    #[test]
    fn test_other_publish_targets_are_not_gates() {
        let mut doc = PubspecDocument::parse("publish_to: https://pub.example.com\n");
        assert!(!doc.has_publish_gate());
        assert!(!doc.remove_publish_gate());
    }

    #[test]
    fn test_separate_sections() {
        let mut doc = PubspecDocument::parse(DEVELOPMENT);
        assert!(doc.separate_sections());
        assert!(doc.render().contains("  ffi: ^2.1.0\n\ndev_dependencies:"));
        assert!(!doc.separate_sections());
    }

    #[test]
    fn test_separate_sections_ignores_sections_before_dependencies() {
        let text = "flutter:\n  uses-material-design: true\ndependencies:\n  ffi: any\n";
        let mut doc = PubspecDocument::parse(text);
        assert!(!doc.separate_sections());
        assert_eq!(doc.render(), text);
    }
}
