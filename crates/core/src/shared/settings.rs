use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::captions::domain::caption_segmenter::SegmentationMode;
use crate::footage::domain::footage::Orientation;
use crate::footage::domain::retry::RetryPolicy;
use crate::shared::constants::{
    DEFAULT_FALLBACK_TERMS, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_CAPTION_SIZE, DEFAULT_MAX_PAGES,
    DEFAULT_MAX_TERMS, DEFAULT_REFERENCE_CLIP_SECONDS, DEFAULT_RETRY_DELAY_MS,
};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    Invalid(String),
}

/// Tunables for one pipeline run. Every field has a default, so a settings
/// file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub max_caption_size: usize,
    pub segmentation: SegmentationMode,
    pub orientation: Orientation,
    pub max_pages: u32,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub reference_clip_seconds: f64,
    pub max_terms: usize,
    pub fallback_terms: usize,
    /// Matching workers; 0 means available parallelism.
    pub workers: usize,
    pub fps: u32,
    pub fallback_color: String,
    pub font_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_caption_size: DEFAULT_MAX_CAPTION_SIZE,
            segmentation: SegmentationMode::PunctuationAgnostic,
            orientation: Orientation::Landscape,
            max_pages: DEFAULT_MAX_PAGES,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            reference_clip_seconds: DEFAULT_REFERENCE_CLIP_SECONDS,
            max_terms: DEFAULT_MAX_TERMS,
            fallback_terms: DEFAULT_FALLBACK_TERMS,
            workers: 0,
            fps: 30,
            fallback_color: "black".to_string(),
            font_size: 40,
        }
    }
}

impl Settings {
    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("Shortreel").join("settings.json"))
    }

    /// Reads an explicit settings file; missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads the per-user settings file if there is one, otherwise defaults.
    pub fn load_default() -> Result<Self, SettingsError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_caption_size == 0 {
            return Err(SettingsError::Invalid(
                "max_caption_size must be at least 1".to_string(),
            ));
        }
        if self.max_pages == 0 {
            return Err(SettingsError::Invalid(
                "max_pages must be at least 1".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(SettingsError::Invalid(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if !(self.reference_clip_seconds.is_finite() && self.reference_clip_seconds >= 0.0) {
            return Err(SettingsError::Invalid(format!(
                "reference_clip_seconds must be a non-negative number, got {}",
                self.reference_clip_seconds
            )));
        }
        if self.fps == 0 {
            return Err(SettingsError::Invalid("fps must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.retry_delay_ms))
    }

    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.max_caption_size, 15);
        assert_eq!(settings.max_pages, 3);
        assert_eq!(settings.orientation, Orientation::Landscape);
    }

    #[test]
    fn test_partial_file_uses_defaults_for_missing_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(
            &path,
            r#"{ "max_caption_size": 24, "segmentation": "punctuation_aware" }"#,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.max_caption_size, 24);
        assert_eq!(settings.segmentation, SegmentationMode::PunctuationAware);
        assert_eq!(settings.max_attempts, 3);
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let err = Settings::load(Path::new("/nonexistent/settings.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }

    #[test]
    fn test_load_malformed_file_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn test_validate_rejects_zero_caption_size() {
        let settings = Settings {
            max_caption_size: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_worker_count_honours_explicit_value() {
        let settings = Settings {
            workers: 3,
            ..Settings::default()
        };
        assert_eq!(settings.worker_count(), 3);
        assert!(Settings::default().worker_count() >= 1);
    }

    #[test]
    fn test_retry_policy_from_settings() {
        let policy = Settings::default().retry_policy();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.delay(), Duration::from_secs(2));
    }
}
