use std::path::Path;

use super::audio_segment::AudioSegment;

/// Domain interface for decoding the narration track.
pub trait AudioReader: Send {
    /// Decode to mono PCM at `target_sample_rate`.
    fn read_audio(
        &self,
        path: &Path,
        target_sample_rate: u32,
    ) -> Result<AudioSegment, Box<dyn std::error::Error>>;
}
