use std::path::PathBuf;
use std::process;

use clap::Parser;

use shortreel_core::audio::infrastructure::ffmpeg_audio_reader::FfmpegAudioReader;
use shortreel_core::audio::infrastructure::piper_synthesizer::PiperSynthesizer;
use shortreel_core::audio::infrastructure::whisper_recognizer::WhisperRecognizer;
use shortreel_core::captions::domain::caption_segmenter::{CaptionSegmenter, SegmentationMode};
use shortreel_core::footage::domain::footage::Orientation;
use shortreel_core::footage::domain::footage_matcher::{FootageMatcher, MatcherConfig};
use shortreel_core::footage::domain::retry::ThreadSleeper;
use shortreel_core::footage::infrastructure::pexels_provider::PexelsProvider;
use shortreel_core::pipeline::generate_video_use_case::GenerateVideoUseCase;
use shortreel_core::pipeline::infrastructure::threaded_match_executor::ThreadedMatchExecutor;
use shortreel_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use shortreel_core::pipeline::script_source::read_script;
use shortreel_core::planning::domain::query_planner::QueryPlanner;
use shortreel_core::planning::infrastructure::keyword_term_extractor::{
    script_keywords, KeywordTermExtractor,
};
use shortreel_core::render::domain::renderer::RenderStyle;
use shortreel_core::render::infrastructure::ffmpeg_cli_renderer::FfmpegCliRenderer;
use shortreel_core::render::infrastructure::http_clip_fetcher::HttpClipFetcher;
use shortreel_core::shared::constants::{WHISPER_MODEL_NAME, WHISPER_MODEL_URL};
use shortreel_core::shared::model_resolver;
use shortreel_core::shared::settings::Settings;

/// Narrated short videos from a text script: speech, timed captions and
/// matching stock footage.
#[derive(Parser)]
#[command(name = "shortreel")]
struct Cli {
    /// Script text file (UTF-8).
    script_file: PathBuf,

    /// Directory for the narration and the rendered video.
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Settings JSON file (defaults to the per-user settings file).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Footage orientation: landscape or portrait.
    #[arg(long)]
    orientation: Option<Orientation>,

    /// Caption size budget in characters.
    #[arg(long)]
    max_caption_size: Option<usize>,

    /// Never let a caption span a sentence boundary.
    #[arg(long)]
    consider_punctuation: bool,

    /// Parallel footage searches (0 = number of CPUs).
    #[arg(long)]
    workers: Option<usize>,

    /// Piper voice model (.onnx).
    #[arg(long, env = "PIPER_MODEL")]
    piper_model: PathBuf,

    /// Whisper model file; downloaded on first use when omitted.
    #[arg(long)]
    whisper_model: Option<PathBuf>,

    /// Pexels API key.
    #[arg(long, env = "PEXELS_KEY", hide_env_values = true)]
    pexels_key: String,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;
    let settings = load_settings(&cli)?;

    let script = read_script(&cli.script_file)?;
    let workers = settings.worker_count();

    log::info!("Resolving model: {WHISPER_MODEL_NAME}");
    let whisper_path = model_resolver::resolve(
        WHISPER_MODEL_NAME,
        WHISPER_MODEL_URL,
        cli.whisper_model.as_deref(),
        Some(Box::new(download_progress)),
    )?;
    eprintln!();

    let segmenter = CaptionSegmenter::new(settings.max_caption_size, settings.segmentation);
    let planner = QueryPlanner::new(Box::new(KeywordTermExtractor::new()), settings.max_terms)
        .with_fallback_terms(script_keywords(&script, settings.fallback_terms));
    let matcher = FootageMatcher::new(
        Box::new(PexelsProvider::new(&cli.pexels_key)?),
        Box::new(ThreadSleeper),
        MatcherConfig {
            orientation: settings.orientation,
            max_pages: settings.max_pages,
            reference_clip_seconds: settings.reference_clip_seconds,
            retry: settings.retry_policy(),
        },
    );
    let style = RenderStyle {
        frame_size: settings.orientation.target_size(),
        fps: settings.fps,
        fallback_color: settings.fallback_color.clone(),
        font_size: settings.font_size,
    };

    let mut use_case = GenerateVideoUseCase::new(
        Box::new(PiperSynthesizer::new(&cli.piper_model)?),
        Box::new(FfmpegAudioReader),
        Box::new(WhisperRecognizer::new(&whisper_path)?),
        segmenter,
        planner,
        matcher,
        Box::new(ThreadedMatchExecutor::new(workers)),
        Box::new(HttpClipFetcher::new(workers)?),
        Box::new(FfmpegCliRenderer::new(style)),
        Box::new(StdoutPipelineLogger::new()),
    );
    let output = use_case.run(&script, &cli.output_dir)?;
    log::info!("Output written to {}", output.display());
    Ok(())
}

/// Settings file values, then command-line overrides on top.
fn load_settings(cli: &Cli) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::load_default()?,
    };
    if let Some(orientation) = cli.orientation {
        settings.orientation = orientation;
    }
    if let Some(size) = cli.max_caption_size {
        settings.max_caption_size = size;
    }
    if cli.consider_punctuation {
        settings.segmentation = SegmentationMode::PunctuationAware;
    }
    if let Some(workers) = cli.workers {
        settings.workers = workers;
    }
    settings.validate()?;
    Ok(settings)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.script_file.exists() {
        return Err(format!("Script file not found: {}", cli.script_file.display()).into());
    }
    if !cli.piper_model.exists() {
        return Err(format!("Piper model not found: {}", cli.piper_model.display()).into());
    }
    if let Some(path) = &cli.whisper_model {
        if !path.exists() {
            return Err(format!("Whisper model not found: {}", path.display()).into());
        }
    }
    if let Some(config) = &cli.config {
        if !config.exists() {
            return Err(format!("Config file not found: {}", config.display()).into());
        }
    }
    if cli.max_caption_size == Some(0) {
        return Err("Max caption size must be at least 1".into());
    }
    if cli.pexels_key.trim().is_empty() {
        return Err("A Pexels API key is required (--pexels-key or PEXELS_KEY)".into());
    }
    if cli.output_dir.is_file() {
        return Err(format!(
            "Output directory is an existing file: {}",
            cli.output_dir.display()
        )
        .into());
    }
    Ok(())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading speech recognition model... {pct}%");
    } else {
        eprint!("\rDownloading speech recognition model... {downloaded} bytes");
    }
}
