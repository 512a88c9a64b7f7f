//! Text normalization helpers shared by the theme and keyword stages.

use crate::types::CleanText;

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_inline_whitespace<T: AsRef<str>>(text: T) -> String {
    text.as_ref()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase, replace everything outside `[a-z0-9]` with a space, collapse and trim.
///
/// The result contains only `[a-z0-9]` runs separated by single spaces, so
/// applying it twice yields the same string.
pub fn normalize_review_text<T: AsRef<str>>(text: T) -> CleanText {
    let stripped: String = text
        .as_ref()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|ch| {
            if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
                ch
            } else {
                ' '
            }
        })
        .collect();
    normalize_inline_whitespace(stripped)
}

/// Null-tolerant variant of [`normalize_review_text`]; `None` maps to `""`.
pub fn normalize_optional_text(text: Option<&str>) -> CleanText {
    text.map(normalize_review_text).unwrap_or_default()
}
