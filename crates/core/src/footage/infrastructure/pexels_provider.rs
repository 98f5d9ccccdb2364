use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::footage::domain::footage::{FootageCandidate, FootageEncoding, Orientation};
use crate::footage::domain::footage_provider::{FootageProvider, ProviderError};
use crate::shared::constants::{PEXELS_PER_PAGE, PEXELS_SEARCH_URL};

const USER_AGENT: &str = concat!("shortreel/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum PexelsError {
    #[error("Pexels API key is empty")]
    MissingKey,
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    videos: Vec<PexelsVideo>,
}

#[derive(Debug, Deserialize)]
struct PexelsVideo {
    width: u32,
    height: u32,
    duration: f64,
    #[serde(default)]
    video_files: Vec<PexelsVideoFile>,
}

#[derive(Debug, Deserialize)]
struct PexelsVideoFile {
    width: Option<u32>,
    height: Option<u32>,
    link: String,
}

impl From<PexelsVideo> for FootageCandidate {
    fn from(video: PexelsVideo) -> Self {
        FootageCandidate {
            width: video.width,
            height: video.height,
            duration: video.duration,
            encodings: video
                .video_files
                .into_iter()
                .filter_map(|f| {
                    Some(FootageEncoding {
                        width: f.width?,
                        height: f.height?,
                        url: f.link,
                    })
                })
                .collect(),
        }
    }
}

/// Footage search against the Pexels video API.
pub struct PexelsProvider {
    client: reqwest::blocking::Client,
    api_key: String,
    endpoint: String,
}

impl PexelsProvider {
    pub fn new(api_key: &str) -> Result<Self, PexelsError> {
        Self::with_endpoint(api_key, PEXELS_SEARCH_URL)
    }

    /// Points the provider at another search URL (e.g. a local mock).
    pub fn with_endpoint(api_key: &str, endpoint: &str) -> Result<Self, PexelsError> {
        if api_key.trim().is_empty() {
            return Err(PexelsError::MissingKey);
        }
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(PexelsError::Client)?;
        Ok(Self {
            client,
            api_key: api_key.trim().to_string(),
            endpoint: endpoint.to_string(),
        })
    }
}

impl FootageProvider for PexelsProvider {
    fn search(
        &self,
        query: &str,
        orientation: Orientation,
        page: u32,
    ) -> Result<Vec<FootageCandidate>, ProviderError> {
        let per_page = PEXELS_PER_PAGE.to_string();
        let page = page.to_string();
        let response: SearchResponse = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .query(&[
                ("query", query),
                ("orientation", orientation.as_str()),
                ("per_page", per_page.as_str()),
                ("page", page.as_str()),
            ])
            .send()?
            .error_for_status()?
            .json()?;

        log::debug!(
            "Pexels returned {} videos for {query:?} (page {page})",
            response.videos.len()
        );
        Ok(response.videos.into_iter().map(FootageCandidate::from).collect())
    }
}

/// Parses a raw search response body; exposed for fixtures and debugging.
pub fn parse_search_response(body: &str) -> Result<Vec<FootageCandidate>, serde_json::Error> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response.videos.into_iter().map(FootageCandidate::from).collect())
}
