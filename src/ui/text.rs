//! Plain-text helpers for upstream HTML fragments

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").expect("valid space regex"));

/// Removes HTML tags and decodes entities, collapsing runs of spaces
pub fn strip_html(html: &str) -> String {
    let without_tags = TAG_RE.replace_all(html, "");
    let decoded = html_escape::decode_html_entities(&without_tags);
    SPACE_RE.replace_all(decoded.trim(), " ").into_owned()
}

/// Splits stripped instruction HTML into non-empty lines
///
/// Block-level tags (`<li>`, `<p>`, `<br>`) start a new line before stripping.
pub fn html_to_lines(html: &str) -> Vec<String> {
    static BLOCK_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)<\s*(li|p|br|ol|ul)[^>]*>").expect("valid block regex"));

    BLOCK_RE
        .replace_all(html, "\n")
        .lines()
        .map(strip_html)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Truncates to at most `max` characters, appending an ellipsis when cut
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}
