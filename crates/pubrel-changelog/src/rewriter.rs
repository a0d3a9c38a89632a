//! Text-in, text-out changelog operations

use pubrel_core::ReleaseMode;
use tracing::{debug, instrument};

use crate::document::Changelog;
use crate::types::VersionHeader;

/// Ensure a section header for `version` exists, inserting it as the first
/// section when missing. Existing headers match with or without the
/// development marker.
pub fn ensure_version_section(text: &str, version: &str, mode: ReleaseMode) -> String {
    let mut changelog = Changelog::parse(text);
    changelog.ensure_version_section(version, mode);
    changelog.render()
}

/// Rewrite `## <version>-WIP` to `## <version>`, leaving other sections alone
pub fn strip_development_marker(text: &str, version: &str) -> String {
    let mut changelog = Changelog::parse(text);
    changelog.strip_development_marker(version);
    changelog.render()
}

/// Insert `- <message>` as the first entry of the target section (or of the
/// topmost section without a target). Returns the input unchanged when no
/// section matches.
pub fn append_message(text: &str, message: &str, target: Option<&str>) -> String {
    let mut changelog = Changelog::parse(text);
    if changelog.append_message(message, target) {
        changelog.render()
    } else {
        text.to_string()
    }
}

/// Topmost version header of the changelog
pub fn current_version(text: &str) -> Option<VersionHeader> {
    Changelog::parse(text).current_version()
}

/// Full changelog update for a version bump: ensure the section, release it
/// in release mode, add the message, then normalize blank lines and the
/// trailing newline.
#[instrument(skip(text, message), fields(len = text.len()))]
pub fn process(text: &str, version: &str, mode: ReleaseMode, message: Option<&str>) -> String {
    let mut changelog = Changelog::parse(text);
    let update = changelog.apply(version, mode, message);
    debug!(?update, "changelog processed");
    changelog.to_normalized_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(text: &str) {
        assert!(!text.contains("\n\n\n"), "blank run in {:?}", text);
        assert!(text.ends_with('\n') && !text.ends_with("\n\n"), "bad ending in {:?}", text);
    }

    #[test]
    fn test_ensure_on_empty_changelog() {
        let output = ensure_version_section("# pkg CHANGELOG\n\n", "1.0.0", ReleaseMode::Development);
        let current = current_version(&output).unwrap();
        assert_eq!(current.label(), "1.0.0-WIP");
        assert!(output.contains("## 1.0.0-WIP"));
    }

    #[test]
    fn test_ensure_existing_returns_input() {
        let text = "# pkg\n\n## 1.0.0\n";
        assert_eq!(ensure_version_section(text, "1.0.0", ReleaseMode::Development), text);
    }

    #[test]
    fn test_append_before_existing_entry() {
        let output = append_message("## 1.0.0-WIP\n\n- old entry\n", "new entry", None);
        assert_eq!(output, "## 1.0.0-WIP\n\n- new entry\n- old entry\n");
    }

    #[test]
    fn test_append_without_match_returns_input() {
        let text = "# pkg\n\n## 1.0.0\n";
        assert_eq!(append_message(text, "x", Some("2.0.0")), text);
    }

    #[test]
    fn test_strip_marker() {
        assert_eq!(
            strip_development_marker("# pkg\n\n## 1.2.0-WIP\n", "1.2.0"),
            "# pkg\n\n## 1.2.0\n"
        );
        assert_eq!(
            strip_development_marker("# pkg\n\n## 1.2.0-WIP\n", "1.3.0"),
            "# pkg\n\n## 1.2.0-WIP\n"
        );
    }

    #[test]
    fn test_process_development_then_release() {
        let dev = process("# minigpu CHANGELOG\n", "1.6.1", ReleaseMode::Development, Some("adds xyz"));
        assert_eq!(dev, "# minigpu CHANGELOG\n\n## 1.6.1-WIP\n\n- adds xyz\n");

        let release = process(&dev, "1.6.1", ReleaseMode::Release, None);
        assert_eq!(release, "# minigpu CHANGELOG\n\n## 1.6.1\n\n- adds xyz\n");
        assert_well_formed(&release);
    }

    #[test]
    fn test_process_new_release_above_history() {
        let text = "# gpu_tensor CHANGELOG\n\n\n\n## 1.0.0\n\n- initial\n\n\n";
        let output = process(text, "1.1.0", ReleaseMode::Release, Some("faster matmul"));
        assert_eq!(
            output,
            "# gpu_tensor CHANGELOG\n\n## 1.1.0\n\n- faster matmul\n\n## 1.0.0\n\n- initial\n"
        );
        assert_well_formed(&output);
    }

    #[test]
    fn test_process_is_stable_without_message() {
        let once = process("# pkg\n\n## 0.9.0\n- a\n", "1.0.0", ReleaseMode::Development, None);
        let twice = process(&once, "1.0.0", ReleaseMode::Development, None);
        assert_eq!(once, twice);
        assert_well_formed(&twice);
    }

    #[test]
    fn test_process_crlf_changelog() {
        let output = process(
            "# pkg CHANGELOG\r\n\r\n\r\n\r\n## 1.0.0-WIP\r\n\r\n- a\r\n",
            "1.0.0",
            ReleaseMode::Release,
            Some("b"),
        );
        assert_eq!(output, "# pkg CHANGELOG\n\n## 1.0.0\n\n- b\n- a\n");
        assert!(!output.contains('\r'));
    }

    #[test]
    fn test_process_collapses_whitespace_only_lines() {
        let output = process("# pkg\n \n\t\n \n## 1.0.0\n\n- a\n", "1.0.0", ReleaseMode::Release, None);
        assert_eq!(output, "# pkg\n\n## 1.0.0\n\n- a\n");
        assert_well_formed(&output);
    }
}
