use super::ScoreResult;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Every score computed for one repository.
///
/// Records are built once scoring completes and are not modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    /// The URL exactly as it appeared in the input list.
    pub url: String,
    pub owner: String,
    pub repo: String,

    pub net_score: ScoreResult,
    pub ramp_up: ScoreResult,
    pub correctness: ScoreResult,
    pub bus_factor: ScoreResult,
    pub responsiveness: ScoreResult,
    pub license: ScoreResult,

    pub bus_factor_count: u64,
    pub total_contributors: u64,
}

impl MetricRecord {
    /// Scores in report order, net score first.
    #[must_use]
    pub const fn scores(&self) -> [&ScoreResult; 6] {
        [
            &self.net_score,
            &self.ramp_up,
            &self.correctness,
            &self.bus_factor,
            &self.responsiveness,
            &self.license,
        ]
    }
}

impl Serialize for MetricRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let scores = self.scores();

        let mut state = serializer.serialize_struct("MetricRecord", 13)?;
        state.serialize_field("URL", &self.url)?;
        for (result, key) in scores.iter().zip(SCORE_KEYS) {
            state.serialize_field(key, &result.value)?;
        }
        for (result, key) in scores.iter().zip(LATENCY_KEYS) {
            state.serialize_field(key, &result.latency_millis())?;
        }
        state.end()
    }
}

const SCORE_KEYS: [&str; 6] = ["NetScore", "RampUp", "Correctness", "BusFactor", "ResponsiveMaintainer", "License"];

const LATENCY_KEYS: [&str; 6] = [
    "NetScore_Latency",
    "RampUp_Latency",
    "Correctness_Latency",
    "BusFactor_Latency",
    "ResponsiveMaintainer_Latency",
    "License_Latency",
];
