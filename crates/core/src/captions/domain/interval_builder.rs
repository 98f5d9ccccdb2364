use super::caption_segmenter::{CaptionChunk, SegmentationMode};
use super::text_layout::advance;
use super::timestamp_mapper::TimestampMapper;
use crate::shared::timeline::TimedInterval;

/// Strips everything except alphanumerics, whitespace, `_`, `-`, `"` and `'`.
pub fn clean_caption(text: &str) -> String {
    text.chars()
        .filter(|c| {
            c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-' | '"' | '\'')
        })
        .collect()
}

/// Anchors caption chunks on the timeline.
///
/// Chunks whose end offset has no timestamp, or whose cleaned text is empty,
/// are dropped; their characters still advance the cursor so later chunks
/// stay aligned.
pub struct IntervalBuilder<'a> {
    mapper: &'a TimestampMapper,
    mode: SegmentationMode,
}

impl<'a> IntervalBuilder<'a> {
    pub fn new(mapper: &'a TimestampMapper, mode: SegmentationMode) -> Self {
        Self { mapper, mode }
    }

    pub fn build(&self, chunks: &[CaptionChunk]) -> Vec<TimedInterval<String>> {
        let mut intervals = Vec::with_capacity(chunks.len());
        let mut cursor = 0;
        let mut start = 0.0;

        for chunk in chunks {
            cursor = advance(cursor, &chunk.text);
            let cleaned = clean_caption(&chunk.text);

            let Some(end) = self.mapper.lookup(cursor) else {
                log::debug!("No timestamp at offset {cursor} for {:?}, dropping", chunk.text);
                continue;
            };
            if cleaned.trim().is_empty() {
                log::debug!("Caption {:?} is empty once cleaned, dropping", chunk.text);
                continue;
            }

            let payload = match self.mode {
                SegmentationMode::PunctuationAgnostic => cleaned,
                SegmentationMode::PunctuationAware => chunk.text.clone(),
            };

            match TimedInterval::new(start, end, payload) {
                Ok(interval) => {
                    intervals.push(interval);
                    start = end;
                }
                Err(e) => log::debug!("Skipping caption {:?}: {e}", chunk.text),
            }
        }

        intervals
    }
}
