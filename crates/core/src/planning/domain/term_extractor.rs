/// Domain interface for turning caption text into footage search phrases.
///
/// Implementations return phrases best-first; an empty list is valid and
/// means the interval gets no footage search.
pub trait TermExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Vec<String>;
}
