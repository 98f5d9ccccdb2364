use std::path::{Path, PathBuf};

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::domain::audio_segment::AudioSegment;
use crate::audio::domain::speech_recognizer::SpeechRecognizer;
use crate::captions::domain::transcript::{Transcript, TranscriptSegment, Word};

/// Speech recognizer using whisper.cpp via whisper-rs.
///
/// Whisper timestamps sub-word tokens; tokens are glued back into words here.
#[derive(Debug)]
pub struct WhisperRecognizer {
    model_path: PathBuf,
    language: String,
}

impl WhisperRecognizer {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !model_path.exists() {
            return Err(format!("Whisper model not found at: {}", model_path.display()).into());
        }
        Ok(Self {
            model_path: model_path.to_path_buf(),
            language: "en".to_string(),
        })
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

/// One timed token as whisper reports it (text keeps its leading space).
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TimedToken {
    pub text: String,
    pub end_time: f64,
}

/// Groups tokens into words: a token with leading whitespace opens a new
/// word, anything else continues the current one. Special tokens such as
/// `[_BEG_]` or `<|endoftext|>` are dropped.
///
/// `last_end` is the floor for end times and is carried from one segment to
/// the next, so times never go backwards across the whole transcript.
pub(crate) fn tokens_to_words(tokens: &[TimedToken], last_end: &mut f64) -> Vec<Word> {
    let mut words: Vec<Word> = Vec::new();

    for token in tokens {
        let trimmed = token.text.trim();
        if trimmed.is_empty() || trimmed.starts_with('[') || trimmed.starts_with('<') {
            continue;
        }
        // Keep end times monotonic even when whisper's alignment wobbles.
        let end_time = token.end_time.max(*last_end);
        *last_end = end_time;

        let opens_word = token.text.starts_with(char::is_whitespace);
        match words.last_mut() {
            Some(word) if !opens_word => {
                word.text.push_str(trimmed);
                word.end_time = end_time;
            }
            _ => words.push(Word::new(trimmed, end_time)),
        }
    }

    words
}

impl SpeechRecognizer for WhisperRecognizer {
    fn transcribe(&self, audio: &AudioSegment) -> Result<Transcript, Box<dyn std::error::Error>> {
        let ctx = WhisperContext::new_with_params(
            self.model_path.to_str().ok_or("Invalid model path")?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| format!("Failed to load Whisper model: {e}"))?;

        let mut state = ctx
            .create_state()
            .map_err(|e| format!("Failed to create Whisper state: {e}"))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some(&self.language));
        params.set_translate(false);
        params.set_token_timestamps(true);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_n_threads(num_cpus().min(4) as i32);

        state
            .full(params, audio.samples())
            .map_err(|e| format!("Whisper inference failed: {e}"))?;

        let mut segments = Vec::new();
        let mut last_end = 0.0_f64;
        for seg_idx in 0..state.full_n_segments() {
            let Some(segment) = state.get_segment(seg_idx) else {
                continue;
            };

            let mut tokens = Vec::new();
            for tok_idx in 0..segment.n_tokens() {
                let Some(token) = segment.get_token(tok_idx) else {
                    continue;
                };
                let Ok(text) = token.to_str() else {
                    continue;
                };
                // Token timestamps are in centiseconds.
                tokens.push(TimedToken {
                    text: text.to_string(),
                    end_time: token.token_data().t1 as f64 / 100.0,
                });
            }

            let words = tokens_to_words(&tokens, &mut last_end);
            if !words.is_empty() {
                segments.push(TranscriptSegment { words });
            }
        }

        let transcript = Transcript::new(segments);
        log::info!(
            "Transcribed {} words over {:.2}s",
            transcript.words().count(),
            transcript.duration()
        );
        Ok(transcript)
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
