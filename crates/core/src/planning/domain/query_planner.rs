use std::collections::HashSet;

use super::term_extractor::TermExtractor;
use crate::shared::timeline::TimedInterval;

/// Turns caption intervals into ranked footage queries over the same spans.
pub struct QueryPlanner {
    extractor: Box<dyn TermExtractor>,
    fallback_terms: Vec<String>,
    max_terms: usize,
}

impl QueryPlanner {
    pub fn new(extractor: Box<dyn TermExtractor>, max_terms: usize) -> Self {
        Self {
            extractor,
            fallback_terms: Vec::new(),
            max_terms,
        }
    }

    /// Terms tried after the caption's own ones, e.g. the script's main topics.
    pub fn with_fallback_terms(mut self, terms: Vec<String>) -> Self {
        self.fallback_terms = terms;
        self
    }

    pub fn plan(&self, captions: &[TimedInterval<String>]) -> Vec<TimedInterval<Vec<String>>> {
        captions
            .iter()
            .map(|caption| caption.with_payload(self.terms_for(caption.payload())))
            .collect()
    }

    pub fn terms_for(&self, text: &str) -> Vec<String> {
        let extracted = self.extractor.extract(text);
        let mut seen = HashSet::new();
        extracted
            .iter()
            .chain(self.fallback_terms.iter())
            .map(|t| t.trim())
            .filter(|t| !t.is_empty() && seen.insert(t.to_lowercase()))
            .take(self.max_terms)
            .map(str::to_string)
            .collect()
    }
}
