use std::path::{Path, PathBuf};

use crate::shared::timeline::TimedInterval;

/// Output look that does not change between runs.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub frame_size: (u32, u32),
    pub fps: u32,
    /// ffmpeg colour name or hex used where no clip was found.
    pub fallback_color: String,
    pub font_size: u32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            frame_size: (1920, 1080),
            fps: 30,
            fallback_color: "black".to_string(),
            font_size: 40,
        }
    }
}

/// Everything needed to compose one video.
///
/// `backgrounds` tiles the narration; `None` entries get the fallback colour.
#[derive(Debug)]
pub struct RenderJob<'a> {
    pub audio_path: &'a Path,
    pub captions: &'a [TimedInterval<String>],
    pub backgrounds: &'a [TimedInterval<Option<PathBuf>>],
    pub duration: f64,
    /// Scratch directory that outlives the render (subtitle file goes here).
    pub work_dir: &'a Path,
    pub output_path: &'a Path,
}

pub trait Renderer: Send {
    fn render(&self, job: &RenderJob) -> Result<(), Box<dyn std::error::Error>>;
}
