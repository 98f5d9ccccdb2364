use super::footage::{clip_identity, FootageCandidate, FootageMatch, Orientation};
use super::footage_provider::FootageProvider;
use super::retry::{RetryPolicy, Sleeper};
use super::used_footage::UsedFootageSet;
use crate::shared::constants::{DEFAULT_MAX_PAGES, DEFAULT_REFERENCE_CLIP_SECONDS};
use crate::shared::timeline::TimedInterval;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherConfig {
    pub orientation: Orientation,
    pub max_pages: u32,
    /// Candidates are ranked by distance to this length, not the interval's.
    pub reference_clip_seconds: f64,
    pub retry: RetryPolicy,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Landscape,
            max_pages: DEFAULT_MAX_PAGES,
            reference_clip_seconds: DEFAULT_REFERENCE_CLIP_SECONDS,
            retry: RetryPolicy::default(),
        }
    }
}

/// Progress of the search for one interval.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    Searching { page: u32, term_index: usize },
    Matched(String),
    Exhausted,
}

impl SearchState {
    pub fn start(term_count: usize) -> Self {
        if term_count == 0 {
            SearchState::Exhausted
        } else {
            SearchState::Searching {
                page: 1,
                term_index: 0,
            }
        }
    }

    /// Next (page, term) after a miss: terms in rank order, then the next page.
    pub fn advance(self, term_count: usize, max_pages: u32) -> Self {
        match self {
            SearchState::Searching { page, term_index } if term_index + 1 < term_count => {
                SearchState::Searching {
                    page,
                    term_index: term_index + 1,
                }
            }
            SearchState::Searching { page, .. } if page < max_pages => SearchState::Searching {
                page: page + 1,
                term_index: 0,
            },
            SearchState::Searching { .. } => SearchState::Exhausted,
            done => done,
        }
    }
}

/// Finds one unused stock clip per interval from its ranked search terms.
pub struct FootageMatcher {
    provider: Box<dyn FootageProvider>,
    sleeper: Box<dyn Sleeper>,
    config: MatcherConfig,
}

impl FootageMatcher {
    pub fn new(
        provider: Box<dyn FootageProvider>,
        sleeper: Box<dyn Sleeper>,
        config: MatcherConfig,
    ) -> Self {
        Self {
            provider,
            sleeper,
            config,
        }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn match_interval(
        &self,
        interval: &TimedInterval<Vec<String>>,
        used: &UsedFootageSet,
    ) -> TimedInterval<FootageMatch> {
        interval.with_payload(self.match_terms(interval.payload(), used))
    }

    /// Walks pages and terms until an unused clip is claimed; the first
    /// satisfying combination wins.
    pub fn match_terms(&self, terms: &[String], used: &UsedFootageSet) -> FootageMatch {
        let mut state = SearchState::start(terms.len());
        loop {
            state = match state {
                SearchState::Searching { page, term_index } => {
                    let term = &terms[term_index];
                    match self.query(term, page).and_then(|c| self.select(c, used)) {
                        Some(url) => SearchState::Matched(url),
                        None => SearchState::Searching { page, term_index }
                            .advance(terms.len(), self.config.max_pages),
                    }
                }
                SearchState::Matched(url) => {
                    log::debug!("Matched {url}");
                    return FootageMatch::found(url);
                }
                SearchState::Exhausted => {
                    log::info!("No footage found for terms {terms:?}");
                    return FootageMatch::none();
                }
            };
        }
    }

    fn query(&self, term: &str, page: u32) -> Option<Vec<FootageCandidate>> {
        let candidates = self.config.retry.run(&*self.sleeper, |_| {
            self.provider.search(term, self.config.orientation, page)
        })?;
        if candidates.is_empty() {
            log::debug!("No results for {term:?} on page {page}");
            return None;
        }
        Some(candidates)
    }

    /// Keeps candidates of the right shape, prefers durations near the
    /// reference length, and claims the first unused encoding at the target size.
    pub fn select(
        &self,
        mut candidates: Vec<FootageCandidate>,
        used: &UsedFootageSet,
    ) -> Option<String> {
        let orientation = self.config.orientation;
        let reference = self.config.reference_clip_seconds;
        let target = orientation.target_size();

        candidates.retain(|c| orientation.accepts(c.width, c.height));
        candidates.sort_by(|a, b| {
            (reference - a.duration)
                .abs()
                .total_cmp(&(reference - b.duration).abs())
        });

        candidates
            .iter()
            .flat_map(|c| c.encodings.iter())
            .find(|e| (e.width, e.height) == target && used.try_claim(clip_identity(&e.url)))
            .map(|e| e.url.clone())
    }
}
