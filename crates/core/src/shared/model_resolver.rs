use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("failed to create model directory: {0}")]
    ModelDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to store model at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine a model directory")]
    NoModelDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`, total is 0 when unknown.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Locate a speech model, downloading it on first use.
///
/// Lookup order: explicit override, the user model directory, then a
/// download into the user model directory.
pub fn resolve(
    name: &str,
    url: &str,
    override_path: Option<&Path>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    if let Some(path) = override_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        log::warn!(
            "Model override {} does not exist, falling back to cache",
            path.display()
        );
    }

    let dir = model_dir()?;
    let cached = dir.join(name);
    if cached.exists() {
        return Ok(cached);
    }

    fs::create_dir_all(&dir).map_err(ModelResolveError::ModelDir)?;
    log::info!("Downloading {name} to {}", dir.display());
    fetch(url, &cached, progress)?;
    Ok(cached)
}

/// `<cache dir>/Shortreel/models`.
pub fn model_dir() -> Result<PathBuf, ModelResolveError> {
    dirs::cache_dir()
        .map(|d| d.join("Shortreel").join("models"))
        .ok_or(ModelResolveError::NoModelDir)
}

fn fetch(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let download_err = |source| ModelResolveError::Download {
        url: url.to_string(),
        source,
    };
    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ModelResolveError::Write { path, source }
    };

    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(download_err)?;
    let total = response.content_length().unwrap_or(0);
    let bytes = response.bytes().map_err(download_err)?;

    // Written next to the destination and renamed once complete.
    let partial = dest.with_extension("part");
    let mut file = fs::File::create(&partial).map_err(write_err(&partial))?;
    let mut written: u64 = 0;
    for chunk in bytes.chunks(1024 * 1024) {
        file.write_all(chunk).map_err(write_err(&partial))?;
        written += chunk.len() as u64;
        if let Some(ref cb) = progress {
            cb(written, total);
        }
    }
    file.flush().map_err(write_err(&partial))?;
    drop(file);

    fs::rename(&partial, dest).map_err(write_err(dest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_prefers_existing_override() {
        let tmp = TempDir::new().unwrap();
        let model = tmp.path().join("ggml-test.bin");
        fs::write(&model, b"weights").unwrap();

        let resolved = resolve(
            "ggml-test.bin",
            "http://invalid.nonexistent.example.com/model",
            Some(&model),
            None,
        )
        .unwrap();
        assert_eq!(resolved, model);
    }

    #[test]
    fn test_model_dir_is_namespaced() {
        let dir = model_dir().unwrap();
        let text = dir.to_string_lossy();
        assert!(text.contains("Shortreel"));
        assert!(text.ends_with("models"));
    }

    #[test]
    fn test_fetch_invalid_url_leaves_nothing_behind() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("model.bin");
        let result = fetch("http://invalid.nonexistent.example.com/model", &dest, None);
        assert!(result.is_err());
        assert!(!dest.exists());
        assert!(!dest.with_extension("part").exists());
    }
}
