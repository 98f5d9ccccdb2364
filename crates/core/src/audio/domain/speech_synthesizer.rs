use std::path::Path;

/// Domain interface for text-to-speech.
///
/// Implementations write a playable audio file (WAV) for the whole script.
pub trait SpeechSynthesizer: Send {
    fn synthesize(&self, text: &str, output_path: &Path) -> Result<(), Box<dyn std::error::Error>>;
}
