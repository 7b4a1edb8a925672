use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CONTROL_CHARS: Regex = Regex::new(r"[\x00-\x1F]").expect("valid regex");
}

/// Marks a query word as excluded when it is the first character.
pub const MINUS_MARKER: char = '-';

/// A word is valid when it has no control characters (U+0000..=U+001F).
pub fn is_valid_word(word: &str) -> bool {
    !CONTROL_CHARS.is_match(word)
}

/// Query word shape check, on top of [`is_valid_word`]: rejects a bare
/// marker and a word that starts with two markers.
pub fn is_valid_query_word(word: &str) -> bool {
    if word.is_empty() || !is_valid_word(word) {
        return false;
    }
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (Some(MINUS_MARKER), None) => false,
        (Some(MINUS_MARKER), Some(MINUS_MARKER)) => false,
        _ => true,
    }
}
