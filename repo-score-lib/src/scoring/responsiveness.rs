use super::calibration::{DAYS_PER_MONTH, RESPONSIVENESS_MAX_COMMITS_PER_MONTH};
use super::{Anomaly, Calibration, Evaluator, Score, normalize};
use crate::facts::RepoSnapshot;

pub const RESPONSIVE_MAINTAINER: &str = "ResponsiveMaintainer";

/// Scores maintenance activity as commits per month of repository life.
#[derive(Debug, Clone, Copy)]
pub struct Responsiveness {
    max_commits_per_month: f64,
}

impl Responsiveness {
    #[must_use]
    pub const fn new(calibration: &Calibration) -> Self {
        Self {
            max_commits_per_month: calibration.responsiveness_max_commits_per_month,
        }
    }

    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "commit and day counts are far below 2^52")]
    pub fn compute(&self, total_commits: u64, days_active: u64) -> Score {
        if days_active == 0 {
            return Score::Suspect(Anomaly::DegenerateInput);
        }

        let months_active = days_active as f64 / DAYS_PER_MONTH;
        normalize(total_commits as f64 / months_active, self.max_commits_per_month, 0.0)
    }
}

impl Default for Responsiveness {
    fn default() -> Self {
        Self {
            max_commits_per_month: RESPONSIVENESS_MAX_COMMITS_PER_MONTH,
        }
    }
}

impl Evaluator for Responsiveness {
    fn name(&self) -> &'static str {
        RESPONSIVE_MAINTAINER
    }

    fn evaluate(&self, snapshot: &RepoSnapshot) -> Score {
        self.compute(snapshot.total_commit_count, snapshot.days_active)
    }
}

#[must_use]
pub fn evaluate_responsiveness(total_commits: u64, days_active: u64) -> Score {
    Responsiveness::default().compute(total_commits, days_active)
}
