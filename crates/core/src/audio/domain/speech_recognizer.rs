use super::audio_segment::AudioSegment;
use crate::captions::domain::transcript::Transcript;

/// Domain interface for speech-to-text with word-level end times.
///
/// End times must be non-decreasing across the whole transcript.
pub trait SpeechRecognizer: Send {
    fn transcribe(&self, audio: &AudioSegment) -> Result<Transcript, Box<dyn std::error::Error>>;
}
