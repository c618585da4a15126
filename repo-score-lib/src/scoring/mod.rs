//! Normalization, per-metric evaluators, and the net score
//!
//! Everything in this module is pure: evaluators read a [`RepoSnapshot`](crate::facts::RepoSnapshot)
//! and produce [`Score`] values without touching the network or the file system.
//!
//! # Implementation Model
//!
//! A single [`normalize`] primitive rescales raw facts into `[0, 1]`. Each sub-metric is an
//! independent [`Evaluator`] configured from the [`Calibration`] table:
//!
//! - [`RampUp`]: README size
//! - [`Correctness`]: share of closed issues
//! - [`BusFactor`]: concentration of commits among contributors
//! - [`Responsiveness`]: commits per month
//! - [`License`]: match against the desired license, with a README fallback
//!
//! [`aggregate`] folds the results into the net score, and [`Scorer`] ties it all together
//! into one [`MetricRecord`] per repository.
//!
//! Scores that fall outside `[0, 1]` are never clamped from above. They become
//! [`Score::Suspect`], which reports as [`CALIBRATION_SENTINEL`] and poisons the net score.

mod bus_factor;
mod calibration;
mod correctness;
mod evaluator;
mod license;
mod metric_record;
mod net_score;
mod normalize;
mod ramp_up;
mod responsiveness;
mod score;
mod score_result;
mod scorer;

pub use bus_factor::{BUS_FACTOR, BusFactor, BusFactorOutcome, evaluate_bus_factor};
pub use calibration::{
    BUS_FACTOR_HEALTHY_SHARE, BUS_FACTOR_MAJORITY_SHARE, Calibration, DAYS_PER_MONTH, RAMP_UP_MAX_WORDS, RAMP_UP_MIN_WORDS,
    RESPONSIVENESS_MAX_COMMITS_PER_MONTH, Weights,
};
pub use correctness::{CORRECTNESS, Correctness, evaluate_correctness};
pub use evaluator::Evaluator;
pub use license::{LICENSE, License, evaluate_license};
pub use metric_record::MetricRecord;
pub use net_score::{NET_SCORE, aggregate};
pub use normalize::normalize;
pub use ramp_up::{RAMP_UP, RampUp, evaluate_ramp_up};
pub use responsiveness::{RESPONSIVE_MAINTAINER, Responsiveness, evaluate_responsiveness};
pub use score::{Anomaly, CALIBRATION_SENTINEL, Score};
pub use score_result::{ScoreResult, measure};
pub use scorer::Scorer;
