//! Whole-document text normalization shared by the manifest and changelog rewriters

use regex::Regex;
use std::sync::LazyLock;

/// Two or more consecutive blank or whitespace-only lines
static BLANK_RUN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").expect("Invalid regex"));

/// Split a document into lines, accepting both `\n` and `\r\n` endings.
///
/// The returned lines carry no line terminator, so joining them with `\n`
/// yields LF-only text.
pub fn split_lines(content: &str) -> Vec<String> {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// Convert line endings to LF, collapse runs of blank lines to a single
/// empty line, trim the document and terminate it with exactly one newline.
pub fn normalize_document(content: &str) -> String {
    let unix = content.replace("\r\n", "\n");
    let collapsed = BLANK_RUN_REGEX.replace_all(&unix, "\n\n");
    let mut output = collapsed.trim().to_string();
    output.push('\n');
    output
}
