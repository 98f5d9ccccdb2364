use serde::{Deserialize, Serialize};

use super::text_layout::{join_words, token_len};

/// Whether chunks may run across sentence boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationMode {
    /// Pack the whole transcript as one word stream.
    #[default]
    PunctuationAgnostic,
    /// Pack each sentence on its own; chunks never straddle `.`, `!` or `?`.
    PunctuationAware,
}

/// A run of consecutive transcript words shown together as one caption.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptionChunk {
    pub text: String,
}

impl CaptionChunk {
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }
}

/// Greedy caption packer.
///
/// Every word costs its length plus one separator. A word that would push
/// the running cost past `max_size` normally opens the next chunk; when the
/// current chunk is still under half the budget the word is squeezed in
/// instead, which keeps trailing fragments from piling up as tiny captions.
pub struct CaptionSegmenter {
    max_size: usize,
    mode: SegmentationMode,
}

impl CaptionSegmenter {
    pub fn new(max_size: usize, mode: SegmentationMode) -> Self {
        Self {
            max_size: max_size.max(1),
            mode,
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn mode(&self) -> SegmentationMode {
        self.mode
    }

    pub fn segment<S: AsRef<str>>(&self, words: &[S]) -> Vec<CaptionChunk> {
        match self.mode {
            SegmentationMode::PunctuationAgnostic => pack(words, self.max_size),
            SegmentationMode::PunctuationAware => split_sentences(words)
                .into_iter()
                .flat_map(|sentence| pack(sentence, self.max_size))
                .collect(),
        }
    }
}

/// Splits a word stream after every word ending in sentence punctuation.
pub fn split_sentences<S: AsRef<str>>(words: &[S]) -> Vec<&[S]> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for (i, word) in words.iter().enumerate() {
        if ends_sentence(word.as_ref()) {
            sentences.push(&words[start..=i]);
            start = i + 1;
        }
    }
    if start < words.len() {
        sentences.push(&words[start..]);
    }
    sentences
}

fn ends_sentence(word: &str) -> bool {
    matches!(word.chars().last(), Some('.' | '!' | '?'))
}

fn pack<S: AsRef<str>>(words: &[S], max_size: usize) -> Vec<CaptionChunk> {
    let half = max_size as f64 / 2.0;
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_cost = 0;

    for word in words {
        let word = word.as_ref();
        let cost = token_len(word) + 1;

        if current_cost + cost <= max_size {
            current.push(word);
            current_cost += cost;
        } else if current_cost as f64 >= half || chunks.is_empty() {
            if !current.is_empty() {
                chunks.push(close(&current));
            }
            current = vec![word];
            current_cost = cost;
        } else {
            current.push(word);
            chunks.push(close(&current));
            current.clear();
            current_cost = 0;
        }
    }

    if !current.is_empty() {
        chunks.push(close(&current));
    }

    chunks
}

fn close(words: &[&str]) -> CaptionChunk {
    CaptionChunk {
        text: join_words(words),
    }
}
