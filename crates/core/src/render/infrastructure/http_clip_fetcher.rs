use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use crate::render::domain::clip_fetcher::ClipFetcher;

const USER_AGENT: &str = concat!("shortreel/", env!("CARGO_PKG_VERSION"));
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

type DownloadError = Box<dyn std::error::Error + Send + Sync>;

/// Parallel HTTP downloader for matched clips.
///
/// Workers pull `(index, url)` jobs from a shared channel; finished files are
/// collected under a mutex and put back in url order at the end.
pub struct HttpClipFetcher {
    client: reqwest::blocking::Client,
    workers: usize,
}

impl HttpClipFetcher {
    pub fn new(workers: usize) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(DOWNLOAD_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            workers: workers.max(1),
        })
    }

    fn download(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        let mut response = self.client.get(url).send()?.error_for_status()?;
        let mut file = fs::File::create(dest)?;
        response.copy_to(&mut file)?;
        Ok(())
    }
}

/// Local file name for the `index`-th clip.
pub fn clip_file_name(index: usize) -> String {
    format!("clip_{index:03}.mp4")
}

impl ClipFetcher for HttpClipFetcher {
    fn fetch(&self, urls: &[String], dir: &Path) -> Vec<Option<PathBuf>> {
        if urls.is_empty() {
            return Vec::new();
        }

        let (job_tx, job_rx) = crossbeam_channel::unbounded::<(usize, &str)>();
        for (index, url) in urls.iter().enumerate() {
            if job_tx.send((index, url.as_str())).is_err() {
                break;
            }
        }
        drop(job_tx);

        let completed: Mutex<Vec<(usize, PathBuf)>> = Mutex::new(Vec::with_capacity(urls.len()));
        let workers = self.workers.min(urls.len());

        std::thread::scope(|s| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let completed = &completed;
                s.spawn(move || {
                    for (index, url) in job_rx.iter() {
                        let dest = dir.join(clip_file_name(index));
                        match self.download(url, &dest) {
                            Ok(()) => {
                                log::debug!("Downloaded {url} to {}", dest.display());
                                completed
                                    .lock()
                                    .unwrap_or_else(|e| e.into_inner())
                                    .push((index, dest));
                            }
                            Err(e) => {
                                log::warn!("Download of {url} failed, using fallback: {e}");
                                let _ = fs::remove_file(&dest);
                            }
                        }
                    }
                });
            }
        });

        let mut paths: Vec<Option<PathBuf>> = vec![None; urls.len()];
        for (index, path) in completed.into_inner().unwrap_or_else(|e| e.into_inner()) {
            paths[index] = Some(path);
        }
        log::info!(
            "Downloaded {}/{} clips",
            paths.iter().filter(|p| p.is_some()).count(),
            urls.len()
        );
        paths
    }
}
