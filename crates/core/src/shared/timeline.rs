use thiserror::Error;

/// Tolerance used when comparing interval boundaries.
pub const TIMELINE_EPSILON: f64 = 1e-6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    #[error("interval [{start}, {end}] has no positive length")]
    Degenerate { start: f64, end: f64 },
    #[error("timeline is empty")]
    Empty,
    #[error("timeline starts at {0}s instead of 0")]
    LateStart(f64),
    #[error("interval {index} starts at {start}s but the previous one ends at {previous_end}s")]
    Discontinuity {
        index: usize,
        previous_end: f64,
        start: f64,
    },
}

/// A `[start, end)` span in seconds carrying a stage-specific payload.
///
/// `start < end` always holds; the constructor rejects anything else.
#[derive(Clone, Debug, PartialEq)]
pub struct TimedInterval<T> {
    start: f64,
    end: f64,
    payload: T,
}

impl<T> TimedInterval<T> {
    pub fn new(start: f64, end: f64, payload: T) -> Result<Self, TimelineError> {
        if !(start.is_finite() && end.is_finite()) || end - start <= 0.0 {
            return Err(TimelineError::Degenerate { start, end });
        }
        Ok(Self {
            start,
            end,
            payload,
        })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn into_payload(self) -> T {
        self.payload
    }

    /// Same bounds, new payload.
    pub fn with_payload<U>(&self, payload: U) -> TimedInterval<U> {
        TimedInterval {
            start: self.start,
            end: self.end,
            payload,
        }
    }

    /// Returns a copy spanning from this interval's start to `other`'s end.
    pub fn spanning<U>(&self, other: &TimedInterval<U>) -> TimedInterval<T>
    where
        T: Clone,
    {
        TimedInterval {
            start: self.start,
            end: other.end.max(self.end),
            payload: self.payload.clone(),
        }
    }
}

/// Checks that `intervals` tile `[0, last.end]`: ordered, contiguous, no overlap.
pub fn validate_tiling<T>(intervals: &[TimedInterval<T>]) -> Result<(), TimelineError> {
    let first = intervals.first().ok_or(TimelineError::Empty)?;
    if first.start.abs() > TIMELINE_EPSILON {
        return Err(TimelineError::LateStart(first.start));
    }

    for (index, pair) in intervals.windows(2).enumerate() {
        let (previous, current) = (&pair[0], &pair[1]);
        if (current.start - previous.end).abs() > TIMELINE_EPSILON {
            return Err(TimelineError::Discontinuity {
                index: index + 1,
                previous_end: previous.end,
                start: current.start,
            });
        }
    }

    Ok(())
}

/// Sum of interval lengths.
pub fn total_duration<T>(intervals: &[TimedInterval<T>]) -> f64 {
    intervals.iter().map(TimedInterval::duration).sum()
}

/// Moves the last interval's end out to `duration` when the audio outlasts
/// the final timestamped word. Never shrinks the timeline.
pub fn stretch_to<T>(intervals: &mut [TimedInterval<T>], duration: f64) {
    if let Some(last) = intervals.last_mut() {
        if duration > last.end {
            last.end = duration;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn tiled(bounds: &[(f64, f64)]) -> Vec<TimedInterval<()>> {
        bounds
            .iter()
            .map(|&(s, e)| TimedInterval::new(s, e, ()).unwrap())
            .collect()
    }

    #[rstest]
    #[case::zero_length(1.0, 1.0)]
    #[case::reversed(2.0, 1.0)]
    #[case::nan(f64::NAN, 1.0)]
    fn test_new_rejects_degenerate(#[case] start: f64, #[case] end: f64) {
        assert!(TimedInterval::new(start, end, ()).is_err());
    }

    #[test]
    fn test_new_keeps_bounds_and_payload() {
        let iv = TimedInterval::new(0.5, 2.0, "hi").unwrap();
        assert_eq!(iv.start(), 0.5);
        assert_eq!(iv.end(), 2.0);
        assert_relative_eq!(iv.duration(), 1.5);
        assert_eq!(*iv.payload(), "hi");
    }

    #[test]
    fn test_with_payload_keeps_bounds() {
        let iv = TimedInterval::new(1.0, 3.0, 7u32).unwrap();
        let mapped = iv.with_payload("x");
        assert_eq!(mapped.start(), 1.0);
        assert_eq!(mapped.end(), 3.0);
        assert_eq!(*mapped.payload(), "x");
    }

    #[test]
    fn test_validate_accepts_contiguous() {
        let intervals = tiled(&[(0.0, 1.0), (1.0, 1.8), (1.8, 2.3)]);
        assert!(validate_tiling(&intervals).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty() {
        let intervals: Vec<TimedInterval<()>> = Vec::new();
        assert_eq!(validate_tiling(&intervals), Err(TimelineError::Empty));
    }

    #[test]
    fn test_validate_rejects_late_start() {
        let intervals = tiled(&[(0.5, 1.0)]);
        assert_eq!(
            validate_tiling(&intervals),
            Err(TimelineError::LateStart(0.5))
        );
    }

    #[rstest]
    #[case::gap(&[(0.0, 1.0), (1.2, 2.0)])]
    #[case::overlap(&[(0.0, 1.0), (0.9, 2.0)])]
    fn test_validate_rejects_discontinuity(#[case] bounds: &[(f64, f64)]) {
        let intervals = tiled(bounds);
        assert!(matches!(
            validate_tiling(&intervals),
            Err(TimelineError::Discontinuity { index: 1, .. })
        ));
    }

    #[test]
    fn test_total_duration() {
        let intervals = tiled(&[(0.0, 1.0), (1.0, 2.5)]);
        assert_relative_eq!(total_duration(&intervals), 2.5);
    }

    #[test]
    fn test_stretch_extends_last_interval() {
        let mut intervals = tiled(&[(0.0, 1.0), (1.0, 2.0)]);
        stretch_to(&mut intervals, 2.6);
        assert_relative_eq!(intervals[1].end(), 2.6);
        assert_relative_eq!(intervals[0].end(), 1.0);
    }

    #[test]
    fn test_stretch_never_shrinks() {
        let mut intervals = tiled(&[(0.0, 2.0)]);
        stretch_to(&mut intervals, 1.0);
        assert_relative_eq!(intervals[0].end(), 2.0);
    }
}
