//! pubspec line classifier

use regex::Regex;
use std::sync::LazyLock;

/// `<indent><key>:<value>`
static KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indent>[ \t]*)(?P<key>\w+):(?P<value>.*)$").expect("Invalid regex")
});

/// Classification of a single manifest line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestLine<'a> {
    /// Empty or whitespace-only line
    Blank,
    /// `# ...`, possibly indented
    Comment { indent: &'a str },
    /// `key: value`, where `value` is everything after the colon
    Key {
        indent: &'a str,
        key: &'a str,
        value: &'a str,
    },
    /// List items, continuation lines and anything else
    Other,
}

impl<'a> ManifestLine<'a> {
    /// Classify a line
    pub fn classify(line: &'a str) -> Self {
        if line.trim().is_empty() {
            return Self::Blank;
        }

        let content = line.trim_start();
        if content.starts_with('#') {
            return Self::Comment {
                indent: &line[..line.len() - content.len()],
            };
        }

        match KEY_REGEX.captures(line) {
            Some(caps) => {
                let (Some(indent), Some(key), Some(value)) =
                    (caps.name("indent"), caps.name("key"), caps.name("value"))
                else {
                    return Self::Other;
                };
                Self::Key {
                    indent: &line[indent.range()],
                    key: &line[key.range()],
                    value: &line[value.range()],
                }
            }
            None => Self::Other,
        }
    }

    /// Whether the line starts at column 0 and is a key or comment
    pub fn is_top_level(&self) -> bool {
        matches!(
            self,
            Self::Key { indent: "", .. } | Self::Comment { indent: "" }
        )
    }

    /// Key of a top-level key line
    pub fn top_level_key(&self) -> Option<&'a str> {
        match self {
            Self::Key { indent: "", key, .. } => Some(*key),
            _ => None,
        }
    }

    /// Whether this is a `path: ../<package>` line
    pub fn is_path_to(&self, package: &str) -> bool {
        match self {
            Self::Key { key: "path", value, .. } => {
                let target = scalar(value);
                let target = target.trim_end_matches('/');
                target.strip_prefix("../") == Some(package)
            }
            _ => false,
        }
    }
}

/// Plain scalar of a value: inline comment, surrounding whitespace and
/// quotes removed
pub fn scalar(value: &str) -> &str {
    let value = match value.find(" #") {
        Some(index) => &value[..index],
        None => value,
    };
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
}
