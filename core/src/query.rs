use crate::error::{Error, Result};
use crate::lexical::{is_valid_query_word, MINUS_MARKER};
use crate::tokenizer::split_into_words;
use std::collections::BTreeSet;

/// Parsed query: required ("plus") and excluded ("minus") terms.
///
/// The same term may sit in both sets; exclusion is applied last and wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub plus_words: BTreeSet<String>,
    pub minus_words: BTreeSet<String>,
}

impl Query {
    pub fn is_empty(&self) -> bool {
        self.plus_words.is_empty() && self.minus_words.is_empty()
    }
}

#[derive(Debug, PartialEq, Eq)]
struct QueryWord<'a> {
    data: &'a str,
    is_minus: bool,
}

fn parse_query_word(word: &str) -> Result<QueryWord<'_>> {
    if !is_valid_query_word(word) {
        return Err(Error::InvalidQuery(format!("malformed word {word:?}")));
    }
    Ok(match word.strip_prefix(MINUS_MARKER) {
        Some(rest) => QueryWord { data: rest, is_minus: true },
        None => QueryWord { data: word, is_minus: false },
    })
}

/// Split `text` into plus and minus terms, dropping anything `is_stop_word` accepts.
pub fn parse_query<F>(text: &str, is_stop_word: F) -> Result<Query>
where
    F: Fn(&str) -> bool,
{
    let mut query = Query::default();
    for word in split_into_words(text) {
        let QueryWord { data, is_minus } = parse_query_word(word)?;
        if is_stop_word(data) {
            continue;
        }
        if is_minus {
            query.minus_words.insert(data.to_string());
        } else {
            query.plus_words.insert(data.to_string());
        }
    }
    Ok(query)
}
