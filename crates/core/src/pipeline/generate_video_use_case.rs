use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::audio::domain::audio_reader::AudioReader;
use crate::audio::domain::speech_recognizer::SpeechRecognizer;
use crate::audio::domain::speech_synthesizer::SpeechSynthesizer;
use crate::captions::domain::caption_segmenter::CaptionSegmenter;
use crate::captions::domain::interval_builder::IntervalBuilder;
use crate::captions::domain::timestamp_mapper::TimestampMapper;
use crate::footage::domain::footage::FootageMatch;
use crate::footage::domain::footage_matcher::FootageMatcher;
use crate::footage::domain::interval_merger::IntervalMerger;
use crate::footage::domain::used_footage::UsedFootageSet;
use crate::pipeline::match_executor::MatchExecutor;
use crate::pipeline::pipeline_error::PipelineError;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::planning::domain::query_planner::QueryPlanner;
use crate::render::domain::clip_fetcher::ClipFetcher;
use crate::render::domain::renderer::{RenderJob, Renderer};
use crate::shared::constants::{NARRATION_FILENAME, RENDER_FILENAME, WHISPER_SAMPLE_RATE};
use crate::shared::timeline::{stretch_to, validate_tiling, TimedInterval};

const STAGE_COUNT: usize = 7;

/// Script in, narrated and captioned video out.
///
/// Stages: synthesize → read audio → transcribe → caption timing → query
/// planning → footage matching → render. Every stage reports its duration to
/// the `PipelineLogger`. A fresh `UsedFootageSet` is created per run.
pub struct GenerateVideoUseCase {
    synthesizer: Box<dyn SpeechSynthesizer>,
    reader: Box<dyn AudioReader>,
    recognizer: Box<dyn SpeechRecognizer>,
    segmenter: CaptionSegmenter,
    planner: QueryPlanner,
    matcher: FootageMatcher,
    executor: Box<dyn MatchExecutor>,
    fetcher: Box<dyn ClipFetcher>,
    renderer: Box<dyn Renderer>,
    logger: Box<dyn PipelineLogger>,
}

impl GenerateVideoUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        synthesizer: Box<dyn SpeechSynthesizer>,
        reader: Box<dyn AudioReader>,
        recognizer: Box<dyn SpeechRecognizer>,
        segmenter: CaptionSegmenter,
        planner: QueryPlanner,
        matcher: FootageMatcher,
        executor: Box<dyn MatchExecutor>,
        fetcher: Box<dyn ClipFetcher>,
        renderer: Box<dyn Renderer>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            synthesizer,
            reader,
            recognizer,
            segmenter,
            planner,
            matcher,
            executor,
            fetcher,
            renderer,
            logger,
        }
    }

    /// Runs the whole pipeline and returns the path of the rendered video.
    pub fn run(&mut self, script: &str, output_dir: &Path) -> Result<PathBuf, PipelineError> {
        let script = script.trim();
        if script.is_empty() {
            return Err(PipelineError::EmptyScript);
        }
        std::fs::create_dir_all(output_dir).map_err(|source| PipelineError::Output {
            path: output_dir.to_path_buf(),
            source,
        })?;

        // 1. Narration
        let started = Instant::now();
        let narration_path = output_dir.join(NARRATION_FILENAME);
        self.synthesizer
            .synthesize(script, &narration_path)
            .map_err(|e| PipelineError::Synthesis(e.to_string()))?;
        self.finish_stage("synthesize", 1, started);

        // 2. Decode
        let started = Instant::now();
        let audio = self
            .reader
            .read_audio(&narration_path, WHISPER_SAMPLE_RATE)
            .map_err(|e| PipelineError::AudioRead(e.to_string()))?;
        self.logger.metric("audio_seconds", audio.duration());
        self.finish_stage("read_audio", 2, started);

        // 3. Word timings
        let started = Instant::now();
        let transcript = self
            .recognizer
            .transcribe(&audio)
            .map_err(|e| PipelineError::Transcription(e.to_string()))?;
        if transcript.is_empty() {
            return Err(PipelineError::EmptyTranscript);
        }
        if transcript.duration() <= 0.0 {
            return Err(PipelineError::ZeroDuration);
        }
        self.logger.metric("words", transcript.words().count() as f64);
        self.finish_stage("transcribe", 3, started);

        // 4. Captions on the timeline
        let started = Instant::now();
        let mapper = TimestampMapper::new(&transcript);
        let chunks = self.segmenter.segment(&transcript.word_texts());
        let mut captions = IntervalBuilder::new(&mapper, self.segmenter.mode()).build(&chunks);
        if captions.is_empty() {
            return Err(PipelineError::NoCaptions);
        }
        let duration = audio.duration().max(transcript.duration());
        stretch_to(&mut captions, duration);
        validate_tiling(&captions)?;
        self.logger.metric("captions", captions.len() as f64);
        self.finish_stage("captions", 4, started);

        // 5. Search terms
        let started = Instant::now();
        let plans = self.planner.plan(&captions);
        self.finish_stage("plan", 5, started);

        // 6. Footage
        let started = Instant::now();
        let used = UsedFootageSet::new();
        let matches = self.executor.match_all(&self.matcher, &plans, &used);
        let merged = IntervalMerger::new().merge(&matches);
        validate_tiling(&merged)?;
        let matched = merged.iter().filter(|m| !m.payload().is_none()).count();
        self.logger.metric("matched_intervals", matched as f64);
        self.logger.metric("background_segments", merged.len() as f64);
        self.finish_stage("match", 6, started);

        // 7. Composition
        let started = Instant::now();
        let output_path = output_dir.join(RENDER_FILENAME);
        let work_dir = tempfile::TempDir::new()
            .map_err(|e| PipelineError::Render(format!("failed to create work dir: {e}")))?;
        let backgrounds = self.fetch_backgrounds(&merged, work_dir.path());
        let job = RenderJob {
            audio_path: &narration_path,
            captions: &captions,
            backgrounds: &backgrounds,
            duration,
            work_dir: work_dir.path(),
            output_path: &output_path,
        };
        self.renderer
            .render(&job)
            .map_err(|e| PipelineError::Render(e.to_string()))?;
        self.finish_stage("render", 7, started);

        self.logger.info(&format!("Video written to {}", output_path.display()));
        self.logger.summary();
        Ok(output_path)
    }

    /// Downloads matched clips and swaps each url for its local file.
    fn fetch_backgrounds(
        &self,
        merged: &[TimedInterval<FootageMatch>],
        dir: &Path,
    ) -> Vec<TimedInterval<Option<PathBuf>>> {
        let urls: Vec<String> = merged
            .iter()
            .filter_map(|m| m.payload().url.clone())
            .collect();
        let mut files = self.fetcher.fetch(&urls, dir).into_iter();

        merged
            .iter()
            .map(|m| {
                let file = match m.payload().url {
                    Some(_) => files.next().flatten(),
                    None => None,
                };
                m.with_payload(file)
            })
            .collect()
    }

    fn finish_stage(&mut self, stage: &str, index: usize, started: Instant) {
        self.logger
            .timing(stage, started.elapsed().as_secs_f64() * 1000.0);
        self.logger.progress(index, STAGE_COUNT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::domain::audio_segment::AudioSegment;
    use crate::captions::domain::caption_segmenter::SegmentationMode;
    use crate::captions::domain::transcript::{Transcript, Word};
    use crate::footage::domain::footage::{FootageCandidate, FootageEncoding, Orientation};
    use crate::footage::domain::footage_matcher::MatcherConfig;
    use crate::footage::domain::footage_provider::{FootageProvider, ProviderError};
    use crate::footage::domain::retry::NoSleep;
    use crate::pipeline::match_executor::SequentialMatchExecutor;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::planning::domain::term_extractor::TermExtractor;
    use crate::shared::timeline::total_duration;
    use approx::assert_relative_eq;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    // ─── Stubs ───

    struct StubSynthesizer {
        fail: bool,
        texts: Arc<Mutex<Vec<String>>>,
    }

    impl SpeechSynthesizer for StubSynthesizer {
        fn synthesize(&self, text: &str, _: &Path) -> Result<(), Box<dyn std::error::Error>> {
            if self.fail {
                return Err("voice model missing".into());
            }
            self.texts.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct StubAudioReader {
        seconds: f64,
    }

    impl AudioReader for StubAudioReader {
        fn read_audio(
            &self,
            _: &Path,
            sample_rate: u32,
        ) -> Result<AudioSegment, Box<dyn std::error::Error>> {
            let n = (self.seconds * sample_rate as f64) as usize;
            Ok(AudioSegment::new(vec![0.0; n], sample_rate, 1))
        }
    }

    struct StubRecognizer {
        words: Vec<Word>,
    }

    impl SpeechRecognizer for StubRecognizer {
        fn transcribe(&self, _: &AudioSegment) -> Result<Transcript, Box<dyn std::error::Error>> {
            Ok(Transcript::from_words(self.words.clone()))
        }
    }

    /// Uses the caption text itself as the only search term.
    struct EchoExtractor;

    impl TermExtractor for EchoExtractor {
        fn extract(&self, text: &str) -> Vec<String> {
            vec![text.to_lowercase()]
        }
    }

    /// Has footage only for the queries it was given.
    struct StubProvider {
        known: Vec<&'static str>,
    }

    impl FootageProvider for StubProvider {
        fn search(
            &self,
            query: &str,
            _: Orientation,
            _: u32,
        ) -> Result<Vec<FootageCandidate>, ProviderError> {
            let Some(id) = self.known.iter().position(|q| *q == query) else {
                return Ok(Vec::new());
            };
            Ok(vec![FootageCandidate {
                width: 1920,
                height: 1080,
                duration: 12.0,
                encodings: vec![FootageEncoding {
                    width: 1920,
                    height: 1080,
                    url: format!("https://cdn.example/{id}.hd.mp4"),
                }],
            }])
        }
    }

    struct StubFetcher {
        requested: Arc<Mutex<Vec<String>>>,
    }

    impl ClipFetcher for StubFetcher {
        fn fetch(&self, urls: &[String], dir: &Path) -> Vec<Option<PathBuf>> {
            self.requested.lock().unwrap().extend(urls.iter().cloned());
            (0..urls.len())
                .map(|i| Some(dir.join(format!("clip_{i}.mp4"))))
                .collect()
        }
    }

    #[derive(Debug, Default, Clone)]
    struct RenderedJob {
        captions: Vec<TimedInterval<String>>,
        backgrounds: Vec<TimedInterval<Option<PathBuf>>>,
        duration: f64,
        output_path: PathBuf,
    }

    struct StubRenderer {
        rendered: Arc<Mutex<Option<RenderedJob>>>,
    }

    impl Renderer for StubRenderer {
        fn render(&self, job: &RenderJob) -> Result<(), Box<dyn std::error::Error>> {
            *self.rendered.lock().unwrap() = Some(RenderedJob {
                captions: job.captions.to_vec(),
                backgrounds: job.backgrounds.to_vec(),
                duration: job.duration,
                output_path: job.output_path.to_path_buf(),
            });
            Ok(())
        }
    }

    struct Harness {
        texts: Arc<Mutex<Vec<String>>>,
        requested: Arc<Mutex<Vec<String>>>,
        rendered: Arc<Mutex<Option<RenderedJob>>>,
    }

    fn scenario_words() -> Vec<Word> {
        vec![
            Word::new("Hello", 0.5),
            Word::new("world.", 1.0),
            Word::new("This", 1.5),
            Word::new("is", 1.7),
            Word::new("a", 1.8),
            Word::new("test.", 2.3),
        ]
    }

    fn use_case(
        words: Vec<Word>,
        audio_seconds: f64,
        known: Vec<&'static str>,
        fail_synthesis: bool,
    ) -> (GenerateVideoUseCase, Harness) {
        let harness = Harness {
            texts: Arc::new(Mutex::new(Vec::new())),
            requested: Arc::new(Mutex::new(Vec::new())),
            rendered: Arc::new(Mutex::new(None)),
        };
        let uc = GenerateVideoUseCase::new(
            Box::new(StubSynthesizer {
                fail: fail_synthesis,
                texts: harness.texts.clone(),
            }),
            Box::new(StubAudioReader {
                seconds: audio_seconds,
            }),
            Box::new(StubRecognizer { words }),
            CaptionSegmenter::new(15, SegmentationMode::PunctuationAgnostic),
            QueryPlanner::new(Box::new(EchoExtractor), 4),
            FootageMatcher::new(
                Box::new(StubProvider { known }),
                Box::new(NoSleep),
                MatcherConfig::default(),
            ),
            Box::new(SequentialMatchExecutor),
            Box::new(StubFetcher {
                requested: harness.requested.clone(),
            }),
            Box::new(StubRenderer {
                rendered: harness.rendered.clone(),
            }),
            Box::new(NullPipelineLogger),
        );
        (uc, harness)
    }

    #[test]
    fn test_happy_path_renders_full_timeline() {
        let tmp = TempDir::new().unwrap();
        let (mut uc, harness) = use_case(scenario_words(), 2.5, vec!["hello world"], false);

        let output = uc.run("  Hello world. This is a test.  ", tmp.path()).unwrap();
        assert_eq!(output, tmp.path().join(RENDER_FILENAME));
        assert_eq!(
            *harness.texts.lock().unwrap(),
            vec!["Hello world. This is a test.".to_string()]
        );

        let job = harness.rendered.lock().unwrap().clone().unwrap();
        let texts: Vec<&str> = job.captions.iter().map(|c| c.payload().as_str()).collect();
        assert_eq!(texts, vec!["Hello world", "This is a", "test"]);
        assert_relative_eq!(job.captions[1].start(), 1.0);
        assert_relative_eq!(job.captions[2].end(), 2.5);
        assert_relative_eq!(job.duration, 2.5);
        assert_eq!(job.output_path, output);

        // First caption matched, the trailing two unmatched ones collapse.
        assert_eq!(job.backgrounds.len(), 2);
        assert!(job.backgrounds[0].payload().is_some());
        assert!(job.backgrounds[1].payload().is_none());
        assert_relative_eq!(job.backgrounds[1].start(), 1.0);
        assert_relative_eq!(total_duration(&job.backgrounds), 2.5);
        assert_eq!(
            *harness.requested.lock().unwrap(),
            vec!["https://cdn.example/0.hd.mp4".to_string()]
        );
    }

    #[test]
    fn test_no_footage_renders_single_fallback_segment() {
        let tmp = TempDir::new().unwrap();
        let (mut uc, harness) = use_case(scenario_words(), 2.3, vec![], false);
        uc.run("Hello world. This is a test.", tmp.path()).unwrap();

        let job = harness.rendered.lock().unwrap().clone().unwrap();
        assert_eq!(job.backgrounds.len(), 1);
        assert!(job.backgrounds[0].payload().is_none());
        assert_relative_eq!(job.backgrounds[0].end(), 2.3);
        assert!(harness.requested.lock().unwrap().is_empty());
    }

    #[test]
    fn test_empty_script_fails_before_synthesis() {
        let tmp = TempDir::new().unwrap();
        let (mut uc, harness) = use_case(scenario_words(), 2.5, vec![], false);
        let err = uc.run(" \n ", tmp.path()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyScript));
        assert!(harness.texts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_empty_transcript_is_error() {
        let tmp = TempDir::new().unwrap();
        let (mut uc, harness) = use_case(vec![], 2.5, vec![], false);
        let err = uc.run("Hello", tmp.path()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyTranscript));
        assert!(harness.rendered.lock().unwrap().is_none());
    }

    #[test]
    fn test_zero_duration_transcript_is_error() {
        let tmp = TempDir::new().unwrap();
        let words = vec![Word::new("Hello", 0.0), Word::new("there", 0.0)];
        let (mut uc, harness) = use_case(words, 0.0, vec![], false);
        let err = uc.run("Hello there", tmp.path()).unwrap_err();
        assert!(matches!(err, PipelineError::ZeroDuration));
        assert!(harness.rendered.lock().unwrap().is_none());
    }

    #[test]
    fn test_synthesis_failure_is_reported() {
        let tmp = TempDir::new().unwrap();
        let (mut uc, _) = use_case(scenario_words(), 2.5, vec![], true);
        let err = uc.run("Hello", tmp.path()).unwrap_err();
        assert!(matches!(err, PipelineError::Synthesis(ref m) if m.contains("voice model")));
    }

    #[test]
    fn test_punctuation_only_transcript_has_no_captions() {
        let tmp = TempDir::new().unwrap();
        let words = vec![Word::new("...", 0.5), Word::new("!", 1.0)];
        let (mut uc, _) = use_case(words, 1.0, vec![], false);
        let err = uc.run("... !", tmp.path()).unwrap_err();
        assert!(matches!(err, PipelineError::NoCaptions));
    }
}
