//! URL extraction from free-form message text.

use once_cell::sync::Lazy;
use regex::Regex;

/// An `http://` or `https://` prefix followed by anything up to the next
/// whitespace. Trailing sentence punctuation is part of the match.
static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+").expect("static URL pattern compiles"));

/// Returns every URL-looking substring of `text`, left to right,
/// non-overlapping, duplicates included. The matched text is preserved
/// verbatim so callers can substitute it back later.
pub fn extract(text: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
