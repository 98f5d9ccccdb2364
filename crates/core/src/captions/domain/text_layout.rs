//! The one place that decides how transcript words become flat caption text.
//!
//! Character offsets into the flattened transcript are computed here and
//! nowhere else. The timestamp mapper, the segmenter's length accounting and
//! the interval builder's cursor must all agree on this join rule or chunk
//! lookups silently land on the wrong word.

pub const SEPARATOR: char = ' ';

/// Length of a token in characters (Unicode scalar values, not bytes).
pub fn token_len(token: &str) -> usize {
    token.chars().count()
}

/// Offset reached after consuming `token` plus its trailing separator.
pub fn advance(cursor: usize, token: &str) -> usize {
    cursor + token_len(token) + 1
}

/// Joins words with a single separator.
pub fn join_words<S: AsRef<str>>(words: &[S]) -> String {
    let mut text = String::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            text.push(SEPARATOR);
        }
        text.push_str(word.as_ref());
    }
    text
}
