use super::Score;
use core::time::Duration;
use std::time::Instant;

/// The outcome of one evaluator run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreResult {
    pub name: &'static str,
    pub value: Score,
    pub latency: Duration,
}

impl ScoreResult {
    /// Wall-clock time spent computing the score, in milliseconds.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "latencies are far below 2^52 nanoseconds")]
    pub fn latency_millis(&self) -> f64 {
        self.latency.as_nanos() as f64 / 1_000_000.0
    }
}

/// Run `compute` once and record how long it took.
pub fn measure(name: &'static str, compute: impl FnOnce() -> Score) -> ScoreResult {
    let start = Instant::now();
    let value = compute();
    let latency = start.elapsed();

    ScoreResult { name, value, latency }
}
