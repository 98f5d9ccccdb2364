pub const WHISPER_MODEL_NAME: &str = "ggml-base.en.bin";
pub const WHISPER_MODEL_URL: &str =
    "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-base.en.bin";
pub const WHISPER_SAMPLE_RATE: u32 = 16000;

pub const PEXELS_SEARCH_URL: &str = "https://api.pexels.com/videos/search";
pub const PEXELS_PER_PAGE: u32 = 15;

/// Caption budget in characters, counting one trailing space per word.
pub const DEFAULT_MAX_CAPTION_SIZE: usize = 15;

pub const DEFAULT_MAX_PAGES: u32 = 3;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 2000;

/// Clip length (seconds) candidates are scored against, whatever the interval length.
pub const DEFAULT_REFERENCE_CLIP_SECONDS: f64 = 15.0;

pub const DEFAULT_MAX_TERMS: usize = 4;
pub const DEFAULT_FALLBACK_TERMS: usize = 2;

pub const NARRATION_FILENAME: &str = "narration.wav";
pub const RENDER_FILENAME: &str = "rendered_video.mp4";
