use super::{Score, ScoreResult, measure};
use crate::facts::RepoSnapshot;

/// A single sub-metric computed from a repository snapshot.
///
/// Implementations are pure: they read the snapshot fields they care about and never
/// perform I/O, so they can run concurrently without coordination.
pub trait Evaluator: Send + Sync {
    /// Stable identifier used as the report key.
    fn name(&self) -> &'static str;

    fn evaluate(&self, snapshot: &RepoSnapshot) -> Score;

    /// Evaluate and record the time spent doing so.
    fn score(&self, snapshot: &RepoSnapshot) -> ScoreResult {
        measure(self.name(), || self.evaluate(snapshot))
    }
}
