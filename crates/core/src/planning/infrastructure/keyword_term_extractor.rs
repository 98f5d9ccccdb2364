use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use crate::captions::domain::interval_builder::clean_caption;
use crate::planning::domain::term_extractor::TermExtractor;

const MIN_TERM_LEN: usize = 3;

fn stopwords() -> &'static HashSet<&'static str> {
    static SW: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SW.get_or_init(|| {
        [
            "a", "an", "the", "to", "of", "in", "on", "at", "by", "for", "with", "and", "or",
            "but", "i", "you", "he", "she", "we", "they", "it", "its", "it's", "be", "is", "are",
            "was", "were", "been", "have", "has", "had", "do", "does", "did", "will", "would",
            "can", "could", "should", "shall", "may", "might", "must", "this", "that", "these",
            "those", "there", "their", "them", "then", "than", "what", "which", "who", "whom",
            "when", "where", "why", "how", "all", "any", "each", "every", "some", "such", "not",
            "no", "nor", "only", "own", "same", "so", "too", "very", "just", "also", "from",
            "into", "about", "over", "under", "again", "once", "here", "our", "your", "his",
            "her", "my", "me", "him", "us", "one", "more", "most", "other", "like", "really",
            "actually", "even", "ever", "while", "because", "if", "as", "up", "down", "out",
            "off", "get", "got", "let's", "don't", "can't", "won't", "you're", "we're", "they're",
        ]
        .into_iter()
        .collect()
    })
}

/// Lower-cased content words of `text` in order of appearance.
fn content_words(text: &str) -> Vec<String> {
    clean_caption(text)
        .split_whitespace()
        .map(|w| w.trim_matches(|c| matches!(c, '"' | '\'' | '-' | '_')).to_lowercase())
        .filter(|w| w.chars().count() >= MIN_TERM_LEN && !stopwords().contains(w.as_str()))
        .collect()
}

/// Stop-word based extractor: no model, no network.
///
/// Ranks the whole content phrase first (when it has two or more words),
/// then single content words from longest to shortest.
#[derive(Debug, Default)]
pub struct KeywordTermExtractor;

impl KeywordTermExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TermExtractor for KeywordTermExtractor {
    fn extract(&self, text: &str) -> Vec<String> {
        let words = content_words(text);
        let mut terms = Vec::with_capacity(words.len() + 1);
        if words.len() >= 2 {
            terms.push(words.join(" "));
        }

        let mut singles: Vec<&String> = Vec::new();
        for w in &words {
            if !singles.contains(&w) {
                singles.push(w);
            }
        }
        singles.sort_by_key(|w| std::cmp::Reverse(w.chars().count()));
        terms.extend(singles.into_iter().cloned());
        terms
    }
}

/// The `n` most frequent content words of the whole script, ties broken by
/// first appearance.
pub fn script_keywords(script: &str, n: usize) -> Vec<String> {
    let words = content_words(script);
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, w) in words.iter().enumerate() {
        counts.entry(w.as_str()).or_insert((0, idx)).0 += 1;
    }
    let mut ranked: Vec<(&str, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
    ranked
        .into_iter()
        .take(n)
        .map(|(w, _)| w.to_string())
        .collect()
}
