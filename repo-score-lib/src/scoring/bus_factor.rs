use super::{Anomaly, Calibration, Evaluator, Score, normalize};
use crate::facts::{Contributor, RepoSnapshot};

const LOG_TARGET: &str = "bus_factor";

pub const BUS_FACTOR: &str = "BusFactor";

/// The full result of a bus-factor computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BusFactorOutcome {
    pub score: Score,

    /// Smallest number of top contributors that together authored the majority of commits.
    pub bus_factor_count: u64,

    pub total_contributors: u64,
}

/// Measures how concentrated a repository's commits are among its contributors.
#[derive(Debug, Clone, Copy)]
pub struct BusFactor {
    majority_share: f64,
    healthy_share: f64,
}

impl BusFactor {
    #[must_use]
    pub const fn new(calibration: &Calibration) -> Self {
        Self {
            majority_share: calibration.bus_factor_majority_share,
            healthy_share: calibration.bus_factor_healthy_share,
        }
    }

    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "contributor and commit counts are far below 2^52")]
    pub fn compute(&self, contributors: &[Contributor]) -> BusFactorOutcome {
        let mut sorted: Vec<&Contributor> = contributors.iter().collect();
        sorted.sort_by(|a, b| b.commit_count.cmp(&a.commit_count));

        let total_commits: u64 = sorted.iter().map(|c| c.commit_count).sum();
        let threshold = self.majority_share * total_commits as f64;

        let mut cumulative = 0u64;
        let mut bus_factor_count = 0u64;
        for contributor in &sorted {
            cumulative += contributor.commit_count;
            bus_factor_count += 1;
            if cumulative as f64 >= threshold {
                break;
            }
        }

        let total_contributors = sorted.len() as u64;
        let healthy_count = self.healthy_share * total_contributors as f64;

        let score = if bus_factor_count < 1 {
            Score::Suspect(Anomaly::DegenerateInput)
        } else if bus_factor_count as f64 >= healthy_count {
            Score::ONE
        } else {
            normalize(bus_factor_count as f64, healthy_count, 1.0)
        };

        log::debug!(
            target: LOG_TARGET,
            "{bus_factor_count} of {total_contributors} contributors authored the majority of {total_commits} commits"
        );

        BusFactorOutcome {
            score,
            bus_factor_count,
            total_contributors,
        }
    }
}

impl Default for BusFactor {
    fn default() -> Self {
        Self::new(&Calibration::default())
    }
}

impl Evaluator for BusFactor {
    fn name(&self) -> &'static str {
        BUS_FACTOR
    }

    fn evaluate(&self, snapshot: &RepoSnapshot) -> Score {
        self.compute(&snapshot.contributors).score
    }
}

/// Compute the bus factor using the default calibration.
#[must_use]
pub fn evaluate_bus_factor(contributors: &[Contributor]) -> BusFactorOutcome {
    BusFactor::default().compute(contributors)
}
