//! Calibration table for all metrics.
//!
//! Every bound used to normalize a raw repository fact lives here. The constants are the
//! defaults; a configuration file may override them per run.

use serde::{Deserialize, Serialize};

/// README word count treated as negligible onboarding material.
pub const RAMP_UP_MIN_WORDS: f64 = 500.0;

/// README word count past which more documentation no longer improves onboarding.
pub const RAMP_UP_MAX_WORDS: f64 = 27_000.0;

/// Commits per month considered maximally responsive.
pub const RESPONSIVENESS_MAX_COMMITS_PER_MONTH: f64 = 330.0;

/// Share of all commits that the bus-factor group must account for.
pub const BUS_FACTOR_MAJORITY_SHARE: f64 = 0.5;

/// Bus-factor group size, as a share of all contributors, considered healthy.
pub const BUS_FACTOR_HEALTHY_SHARE: f64 = 0.4;

/// Days per month when converting repository age to months.
pub const DAYS_PER_MONTH: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Calibration {
    pub ramp_up_min_words: f64,
    pub ramp_up_max_words: f64,
    pub responsiveness_max_commits_per_month: f64,
    pub bus_factor_majority_share: f64,
    pub bus_factor_healthy_share: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            ramp_up_min_words: RAMP_UP_MIN_WORDS,
            ramp_up_max_words: RAMP_UP_MAX_WORDS,
            responsiveness_max_commits_per_month: RESPONSIVENESS_MAX_COMMITS_PER_MONTH,
            bus_factor_majority_share: BUS_FACTOR_MAJORITY_SHARE,
            bus_factor_healthy_share: BUS_FACTOR_HEALTHY_SHARE,
        }
    }
}

/// Integer weights of the four sub-metrics folded into the net score.
///
/// The license score is not weighted: it gates the net score multiplicatively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Weights {
    pub ramp_up: u32,
    pub correctness: u32,
    pub bus_factor: u32,
    pub responsiveness: u32,
}

impl Weights {
    /// Sum of all weights, widened so that no combination of `u32` weights can overflow.
    #[must_use]
    pub fn total(&self) -> u64 {
        [self.ramp_up, self.correctness, self.bus_factor, self.responsiveness]
            .into_iter()
            .map(u64::from)
            .sum()
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            ramp_up: 1,
            correctness: 1,
            bus_factor: 1,
            responsiveness: 1,
        }
    }
}
