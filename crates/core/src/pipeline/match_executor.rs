use crate::footage::domain::footage::FootageMatch;
use crate::footage::domain::footage_matcher::FootageMatcher;
use crate::footage::domain::used_footage::UsedFootageSet;
use crate::shared::timeline::TimedInterval;

/// Abstracts how intervals are fanned out to the footage matcher.
///
/// Implementations must return one match per input interval, in input order.
/// The `UsedFootageSet` is the only state shared between intervals.
pub trait MatchExecutor: Send {
    fn match_all(
        &self,
        matcher: &FootageMatcher,
        intervals: &[TimedInterval<Vec<String>>],
        used: &UsedFootageSet,
    ) -> Vec<TimedInterval<FootageMatch>>;
}

/// Matches intervals one after another on the calling thread.
#[derive(Debug, Default)]
pub struct SequentialMatchExecutor;

impl MatchExecutor for SequentialMatchExecutor {
    fn match_all(
        &self,
        matcher: &FootageMatcher,
        intervals: &[TimedInterval<Vec<String>>],
        used: &UsedFootageSet,
    ) -> Vec<TimedInterval<FootageMatch>> {
        intervals
            .iter()
            .map(|interval| matcher.match_interval(interval, used))
            .collect()
    }
}
