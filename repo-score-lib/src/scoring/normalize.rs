use super::{Anomaly, Score};

const LOG_TARGET: &str = " normalize";

/// Rescale `input` linearly so that `min` maps to 0 and `max` maps to 1.
///
/// Inputs at or below `min` clamp to 0. Inputs whose rescaled value exceeds 1 are not
/// clamped: they produce [`Anomaly::MaxTooLow`], since that means `max` is miscalibrated
/// for the observed data.
#[must_use]
pub fn normalize(input: f64, max: f64, min: f64) -> Score {
    let fraction = (input - min) / (max - min);

    let score = if fraction.is_nan() {
        Score::Suspect(Anomaly::DegenerateInput)
    } else if fraction < 0.0 {
        Score::ZERO
    } else if fraction > 1.0 {
        Score::Suspect(Anomaly::MaxTooLow)
    } else {
        Score::Valid(fraction)
    };

    log::trace!(target: LOG_TARGET, "normalize({input}, max={max}, min={min}) -> {fraction} -> {score:?}");
    score
}
