//! Changelog line classifier

use pubrel_core::DEVELOPMENT_MARKER;

use crate::types::{LineKind, VersionHeader};

/// Classify a single changelog line
pub fn classify(line: &str) -> LineKind {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }

    if line.starts_with('#') {
        if !line.starts_with("##") {
            return LineKind::Title;
        }
        return match parse_version_header(line) {
            Some(header) => LineKind::VersionHeader(header),
            None => LineKind::Heading,
        };
    }

    let trimmed = line.trim_start();
    if trimmed.starts_with("- ") || trimmed.starts_with("* ") || trimmed == "-" {
        return LineKind::Bullet;
    }

    LineKind::Text
}

/// Parse a `## <version>[-WIP][ trailing text]` header.
///
/// The version token must be a valid semantic version once the development
/// marker is removed. `### ...` and deeper headings never match.
pub fn parse_version_header(line: &str) -> Option<VersionHeader> {
    let rest = line.strip_prefix("##")?;
    if rest.starts_with('#') {
        return None;
    }

    let rest = rest.trim_start();
    let token_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let (token, suffix) = rest.split_at(token_end);

    let (version, development) = match token.strip_suffix(DEVELOPMENT_MARKER) {
        Some(version) => (version, true),
        None => (token, false),
    };

    semver::Version::parse(version).ok()?;

    Some(VersionHeader {
        version: version.to_string(),
        development,
        suffix: suffix.trim_end().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_title_and_headings() {
        assert_eq!(classify("# minigpu CHANGELOG"), LineKind::Title);
        assert_eq!(classify("## Unreleased"), LineKind::Heading);
        assert_eq!(classify("### 1.0.0"), LineKind::Heading);
        assert!(matches!(classify("## 1.0.0"), LineKind::VersionHeader(_)));
    }

    #[test]
    fn test_classify_body_lines() {
        assert_eq!(classify("- fixed a leak"), LineKind::Bullet);
        assert_eq!(classify("  * nested"), LineKind::Bullet);
        assert_eq!(classify("   "), LineKind::Blank);
        assert_eq!(classify("Some prose."), LineKind::Text);
    }

    #[test]
    fn test_parse_development_header() {
        let header = parse_version_header("## 1.6.1-WIP").unwrap();
        assert_eq!(header.version, "1.6.1");
        assert!(header.development);
        assert!(header.suffix.is_empty());
    }

    #[test]
    fn test_parse_header_without_space() {
        let header = parse_version_header("##1.0.0").unwrap();
        assert_eq!(header.version, "1.0.0");
        assert!(!header.development);
    }

    #[test]
    fn test_parse_header_with_trailing_text() {
        let header = parse_version_header("## 2.0.0 - 2024-05-01").unwrap();
        assert_eq!(header.version, "2.0.0");
        assert_eq!(header.suffix, " - 2024-05-01");
    }

    #[test]
    fn test_parse_prerelease_header() {
        let header = parse_version_header("## 2.0.0-beta.1-WIP").unwrap();
        assert_eq!(header.version, "2.0.0-beta.1");
        assert!(header.development);
    }

    #[test]
    fn test_rejects_non_versions() {
        assert!(parse_version_header("## Unreleased").is_none());
        assert!(parse_version_header("## 1.0").is_none());
        assert!(parse_version_header("## [1.0.0]").is_none());
        assert!(parse_version_header("## -WIP").is_none());
    }
}
