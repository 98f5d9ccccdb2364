use super::text_layout::advance;
use super::transcript::Transcript;

/// Inclusive character range of one word (plus its trailing separator)
/// in the flattened transcript.
#[derive(Clone, Debug, PartialEq)]
struct WordSpan {
    start: usize,
    end: usize,
    end_time: f64,
}

/// Maps character positions in the flattened transcript back to word end-times.
#[derive(Clone, Debug, Default)]
pub struct TimestampMapper {
    spans: Vec<WordSpan>,
}

impl TimestampMapper {
    pub fn new(transcript: &Transcript) -> Self {
        let mut spans = Vec::new();
        let mut offset = 0;
        for word in transcript.words() {
            let next = advance(offset, &word.text);
            spans.push(WordSpan {
                start: offset,
                end: next,
                end_time: word.end_time,
            });
            offset = next;
        }
        Self { spans }
    }

    /// End-time of the first word whose range contains `position`.
    ///
    /// Neighbouring ranges share their boundary offset; the earlier word wins.
    pub fn lookup(&self, position: usize) -> Option<f64> {
        let idx = self.spans.partition_point(|s| s.end < position);
        self.spans
            .get(idx)
            .filter(|s| s.start <= position)
            .map(|s| s.end_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captions::domain::transcript::{TranscriptSegment, Word};
    use rstest::rstest;

    fn scenario() -> Transcript {
        Transcript::from_words(vec![
            Word::new("Hello", 0.5),
            Word::new("world.", 1.0),
            Word::new("This", 1.5),
            Word::new("is", 1.7),
            Word::new("a", 1.8),
            Word::new("test.", 2.3),
        ])
    }

    #[rstest]
    #[case::start_of_text(0, Some(0.5))]
    #[case::inside_first_word(3, Some(0.5))]
    #[case::shared_boundary_goes_to_earlier_word(6, Some(0.5))]
    #[case::second_word(7, Some(1.0))]
    #[case::end_of_second_word(13, Some(1.0))]
    #[case::after_this_is_a(23, Some(1.8))]
    #[case::end_of_text(29, Some(2.3))]
    #[case::past_end(30, None)]
    fn test_lookup(#[case] position: usize, #[case] expected: Option<f64>) {
        let mapper = TimestampMapper::new(&scenario());
        assert_eq!(mapper.lookup(position), expected);
    }

    #[test]
    fn test_offsets_continue_across_segments() {
        let transcript = Transcript::new(vec![
            TranscriptSegment {
                words: vec![Word::new("one", 0.4)],
            },
            TranscriptSegment {
                words: vec![Word::new("two", 0.9)],
            },
        ]);
        let mapper = TimestampMapper::new(&transcript);
        assert_eq!(mapper.lookup(4), Some(0.4));
        assert_eq!(mapper.lookup(8), Some(0.9));
        assert_eq!(mapper.lookup(9), None);
    }

    #[test]
    fn test_empty_transcript_never_matches() {
        let mapper = TimestampMapper::new(&Transcript::default());
        assert_eq!(mapper.lookup(0), None);
    }

    #[test]
    fn test_multibyte_words_use_char_offsets() {
        let transcript =
            Transcript::from_words(vec![Word::new("café", 0.6), Word::new("noir", 1.1)]);
        let mapper = TimestampMapper::new(&transcript);
        assert_eq!(mapper.lookup(5), Some(0.6));
        assert_eq!(mapper.lookup(10), Some(1.1));
    }
}
