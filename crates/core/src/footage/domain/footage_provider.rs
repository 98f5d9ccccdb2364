use super::footage::{FootageCandidate, Orientation};

pub type ProviderError = Box<dyn std::error::Error + Send + Sync>;

/// Domain interface for a stock-footage search service.
///
/// Implementations may fail transiently; callers retry and then treat the
/// query as having no results.
pub trait FootageProvider: Send + Sync {
    fn search(
        &self,
        query: &str,
        orientation: Orientation,
        page: u32,
    ) -> Result<Vec<FootageCandidate>, ProviderError>;
}
