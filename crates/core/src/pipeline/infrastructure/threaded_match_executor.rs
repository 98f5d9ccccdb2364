use crate::footage::domain::footage::FootageMatch;
use crate::footage::domain::footage_matcher::FootageMatcher;
use crate::footage::domain::used_footage::UsedFootageSet;
use crate::pipeline::match_executor::MatchExecutor;
use crate::shared::timeline::TimedInterval;

/// Matches intervals on a pool of scoped worker threads.
///
/// Layout: `jobs (index, interval) → N workers → results (index, match)`
///
/// Each interval is searched sequentially by one worker; intervals run in
/// parallel. Clip claims go through the shared `UsedFootageSet`, so two
/// workers can never assign the same clip.
pub struct ThreadedMatchExecutor {
    workers: usize,
}

impl ThreadedMatchExecutor {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Default for ThreadedMatchExecutor {
    fn default() -> Self {
        Self::new(
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        )
    }
}

impl MatchExecutor for ThreadedMatchExecutor {
    fn match_all(
        &self,
        matcher: &FootageMatcher,
        intervals: &[TimedInterval<Vec<String>>],
        used: &UsedFootageSet,
    ) -> Vec<TimedInterval<FootageMatch>> {
        if intervals.is_empty() {
            return Vec::new();
        }

        let (job_tx, job_rx) =
            crossbeam_channel::bounded::<(usize, &TimedInterval<Vec<String>>)>(intervals.len());
        let (result_tx, result_rx) =
            crossbeam_channel::bounded::<(usize, TimedInterval<FootageMatch>)>(intervals.len());

        for job in intervals.iter().enumerate() {
            if job_tx.send(job).is_err() {
                break;
            }
        }
        drop(job_tx);

        let workers = self.workers.min(intervals.len());
        log::debug!("Matching {} intervals on {workers} workers", intervals.len());

        std::thread::scope(|s| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                s.spawn(move || {
                    for (index, interval) in job_rx.iter() {
                        let matched = matcher.match_interval(interval, used);
                        if result_tx.send((index, matched)).is_err() {
                            break;
                        }
                    }
                });
            }
        });
        drop(result_tx);

        let mut slots: Vec<Option<TimedInterval<FootageMatch>>> =
            (0..intervals.len()).map(|_| None).collect();
        for (index, matched) in result_rx.iter() {
            slots[index] = Some(matched);
        }

        slots
            .into_iter()
            .zip(intervals)
            .map(|(slot, interval)| {
                slot.unwrap_or_else(|| interval.with_payload(FootageMatch::none()))
            })
            .collect()
    }
}
