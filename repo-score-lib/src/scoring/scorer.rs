use super::{BusFactor, Calibration, Correctness, Evaluator, License, MetricRecord, RampUp, Responsiveness, Weights, aggregate, measure};
use crate::Result;
use crate::facts::{RepoSnapshot, RepoSpec};

const LOG_TARGET: &str = "    scorer";

/// Runs every evaluator over a snapshot and folds the results into a [`MetricRecord`].
#[derive(Debug, Clone)]
pub struct Scorer {
    ramp_up: RampUp,
    correctness: Correctness,
    bus_factor: BusFactor,
    responsiveness: Responsiveness,
    license: License,
    weights: Weights,
}

impl Scorer {
    /// # Errors
    ///
    /// Returns an error if the desired license cannot be searched for.
    pub fn new(desired_license: &str, calibration: &Calibration, weights: Weights) -> Result<Self> {
        Ok(Self {
            ramp_up: RampUp::new(calibration),
            correctness: Correctness,
            bus_factor: BusFactor::new(calibration),
            responsiveness: Responsiveness::new(calibration),
            license: License::new(desired_license)?,
            weights,
        })
    }

    /// Score one repository. `url` is the entry as written in the input list.
    #[must_use]
    pub fn score(&self, url: &str, spec: &RepoSpec, snapshot: &RepoSnapshot) -> MetricRecord {
        let ramp_up = self.ramp_up.score(snapshot);
        let correctness = self.correctness.score(snapshot);

        let mut bus_factor_outcome = None;
        let bus_factor = measure(self.bus_factor.name(), || {
            let outcome = self.bus_factor.compute(&snapshot.contributors);
            bus_factor_outcome = Some(outcome);
            outcome.score
        });
        let (bus_factor_count, total_contributors) =
            bus_factor_outcome.map_or((0, 0), |outcome| (outcome.bus_factor_count, outcome.total_contributors));

        let responsiveness = self.responsiveness.score(snapshot);
        let license = self.license.score(snapshot);
        let net_score = aggregate(&ramp_up, &correctness, &bus_factor, &responsiveness, &license, &self.weights);

        log::info!(target: LOG_TARGET, "Scored {spec}: net score {:?}", net_score.value);

        MetricRecord {
            url: url.to_string(),
            owner: spec.owner().to_string(),
            repo: spec.repo().to_string(),
            net_score,
            ramp_up,
            correctness,
            bus_factor,
            responsiveness,
            license,
            bus_factor_count,
            total_contributors,
        }
    }
}
