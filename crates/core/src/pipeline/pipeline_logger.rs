use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting logger for pipeline orchestration events.
///
/// Keeps the use case free of output concerns: the CLI logs through the
/// `log` facade, tests discard everything.
pub trait PipelineLogger: Send {
    /// Report stage-level progress.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named stage took.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. caption count, matched intervals).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-pipeline summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// CLI logger: records stage timings and metrics in the order they were
/// first seen and reports them once the run completes.
pub struct StdoutPipelineLogger {
    stages: Vec<(String, f64)>,
    metrics: HashMap<String, f64>,
    metric_order: Vec<String>,
    start_time: Instant,
}

impl StdoutPipelineLogger {
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            metrics: HashMap::new(),
            metric_order: Vec::new(),
            start_time: Instant::now(),
        }
    }

    /// Returns the formatted summary string, or `None` if no data recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.stages.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Pipeline summary ({} stages, {:.1}s total):",
            self.stages.len(),
            elapsed_ms / 1000.0
        )];

        for (stage, ms) in &self.stages {
            let pct = if elapsed_ms > 0.0 {
                ms / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!("  {stage:12}: {ms:8.0}ms  ({pct:4.1}%)"));
        }

        for name in &self.metric_order {
            lines.push(format!("  {name}: {}", self.metrics[name]));
        }

        Some(lines.join("\n"))
    }

    /// Total time recorded for a stage, summed over repeats.
    pub fn timing_for(&self, stage: &str) -> Option<f64> {
        let mut found = None;
        for (name, ms) in &self.stages {
            if name == stage {
                *found.get_or_insert(0.0) += ms;
            }
        }
        found
    }

    /// Latest value recorded for a metric.
    pub fn metric_for(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        if total > 0 {
            log::info!("Stage {current}/{total}");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.stages.push((stage.to_string(), duration_ms));
    }

    fn metric(&mut self, name: &str, value: f64) {
        if self.metrics.insert(name.to_string(), value).is_none() {
            self.metric_order.push(name.to_string());
        }
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.progress(1, 10);
        logger.timing("transcribe", 5.0);
        logger.metric("captions", 3.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_sums_repeated_stage() {
        let mut logger = StdoutPipelineLogger::new();
        logger.timing("match", 20.0);
        logger.timing("render", 5.0);
        logger.timing("match", 30.0);

        assert_eq!(logger.timing_for("match"), Some(50.0));
        assert_eq!(logger.timing_for("render"), Some(5.0));
        assert_eq!(logger.timing_for("synthesize"), None);
    }

    #[test]
    fn test_metric_keeps_latest_value() {
        let mut logger = StdoutPipelineLogger::new();
        logger.metric("matched_intervals", 3.0);
        logger.metric("matched_intervals", 4.0);
        assert_eq!(logger.metric_for("matched_intervals"), Some(4.0));
    }

    #[test]
    fn test_summary_lists_stages_in_order() {
        let mut logger = StdoutPipelineLogger::new();
        logger.timing("synthesize", 20.0);
        logger.timing("transcribe", 30.0);
        logger.metric("captions", 7.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Pipeline summary (2 stages"));
        let synth = summary.find("synthesize").unwrap();
        let transcribe = summary.find("transcribe").unwrap();
        assert!(synth < transcribe);
        assert!(summary.contains("captions: 7"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(StdoutPipelineLogger::new().summary_string().is_none());
    }

    #[test]
    fn test_info_leaves_summary_empty() {
        let mut logger = StdoutPipelineLogger::new();
        logger.info("hello world");
        assert!(logger.summary_string().is_none());
    }
}
