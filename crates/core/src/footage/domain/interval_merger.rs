use super::footage::FootageMatch;
use crate::shared::timeline::TimedInterval;

/// Collapses each run of consecutive unmatched intervals into one gap so the
/// renderer can lay a single fallback background across it.
///
/// Matched intervals pass through untouched and are never joined, even when
/// neighbours share a clip.
pub struct IntervalMerger;

impl IntervalMerger {
    pub fn new() -> Self {
        Self
    }

    pub fn merge(
        &self,
        intervals: &[TimedInterval<FootageMatch>],
    ) -> Vec<TimedInterval<FootageMatch>> {
        let mut merged: Vec<TimedInterval<FootageMatch>> = Vec::with_capacity(intervals.len());

        for interval in intervals {
            match merged.last_mut() {
                Some(gap) if gap.payload().is_none() && interval.payload().is_none() => {
                    *gap = gap.spanning(interval);
                }
                _ => merged.push(interval.clone()),
            }
        }

        merged
    }
}

impl Default for IntervalMerger {
    fn default() -> Self {
        Self::new()
    }
}
