use super::{Evaluator, Score, normalize};
use crate::facts::RepoSnapshot;

pub const CORRECTNESS: &str = "Correctness";

/// Scores issue-resolution health as the share of issues that have been closed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Correctness;

impl Evaluator for Correctness {
    fn name(&self) -> &'static str {
        CORRECTNESS
    }

    fn evaluate(&self, snapshot: &RepoSnapshot) -> Score {
        evaluate_correctness(snapshot.open_issue_count, snapshot.total_issue_count())
    }
}

/// A repository with no issues at all scores 1: nothing filed is no evidence of defects.
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "issue counts are far below 2^52")]
pub fn evaluate_correctness(open_issue_count: u64, total_issue_count: u64) -> Score {
    if total_issue_count == 0 {
        return Score::ONE;
    }

    let open_share = open_issue_count as f64 / total_issue_count as f64;
    normalize(1.0 - open_share, 1.0, 0.0)
}
