use super::text_layout::join_words;

/// A recognised word and the time (seconds) at which it finishes.
#[derive(Clone, Debug, PartialEq)]
pub struct Word {
    pub text: String,
    pub end_time: f64,
}

impl Word {
    pub fn new(text: impl Into<String>, end_time: f64) -> Self {
        Self {
            text: text.into(),
            end_time,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TranscriptSegment {
    pub words: Vec<Word>,
}

/// Word-level transcription of the narration, grouped as the engine segmented it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transcript {
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    pub fn new(segments: Vec<TranscriptSegment>) -> Self {
        Self { segments }
    }

    /// Convenience for a transcript with a single segment.
    pub fn from_words(words: Vec<Word>) -> Self {
        Self {
            segments: vec![TranscriptSegment { words }],
        }
    }

    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.segments.iter().flat_map(|s| s.words.iter())
    }

    pub fn word_texts(&self) -> Vec<&str> {
        self.words().map(|w| w.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.words().next().is_none()
    }

    /// End time of the last word, or 0 for an empty transcript.
    pub fn duration(&self) -> f64 {
        self.words().last().map(|w| w.end_time).unwrap_or(0.0)
    }

    pub fn flattened_text(&self) -> String {
        join_words(&self.word_texts())
    }
}
