use serde::{Serialize, Serializer};
use strum::Display;

/// Numeric form of a [`Score::Suspect`] value in reports.
pub const CALIBRATION_SENTINEL: f64 = 2.0;

/// Why a score could not be placed in the `[0, 1]` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Anomaly {
    /// The normalization upper bound is too low for the observed input.
    #[strum(to_string = "normalization maximum too low for input")]
    MaxTooLow,

    /// The input cannot be measured meaningfully (no contributors, no active days, empty range).
    #[strum(to_string = "degenerate input")]
    DegenerateInput,
}

/// A bounded metric score.
///
/// Valid scores lie in `[0, 1]`. Suspect scores flag a miscalibrated scale or degenerate
/// input; they serialize as [`CALIBRATION_SENTINEL`] so they can never be mistaken for a
/// real measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    Valid(f64),
    Suspect(Anomaly),
}

impl Score {
    pub const ZERO: Self = Self::Valid(0.0);
    pub const ONE: Self = Self::Valid(1.0);

    /// The number written to reports.
    #[must_use]
    pub const fn as_f64(self) -> f64 {
        match self {
            Self::Valid(value) => value,
            Self::Suspect(_) => CALIBRATION_SENTINEL,
        }
    }

    #[must_use]
    pub const fn is_suspect(self) -> bool {
        matches!(self, Self::Suspect(_))
    }

    #[must_use]
    pub const fn anomaly(self) -> Option<Anomaly> {
        match self {
            Self::Valid(_) => None,
            Self::Suspect(anomaly) => Some(anomaly),
        }
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}
