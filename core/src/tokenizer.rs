use std::collections::BTreeSet;

/// Split text into words on the space character, dropping empty pieces.
///
/// Only `' '` separates words. Tabs, newlines and other control characters
/// stay inside the word so that the lexical check can reject it.
pub fn split_into_words(text: &str) -> Vec<&str> {
    text.split(' ').filter(|w| !w.is_empty()).collect()
}

/// Collect strings into an ordered set, skipping empty ones.
pub fn make_unique_non_empty_strings<I, S>(strings: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    strings
        .into_iter()
        .filter_map(|s| {
            let s = s.as_ref();
            (!s.is_empty()).then(|| s.to_string())
        })
        .collect()
}
