use std::path::{Path, PathBuf};

/// Downloads matched footage so the renderer can read it locally.
pub trait ClipFetcher: Send {
    /// Returns one entry per url, in order. A failed download is `None`
    /// and the interval falls back to a plain background.
    fn fetch(&self, urls: &[String], dir: &Path) -> Vec<Option<PathBuf>>;
}
