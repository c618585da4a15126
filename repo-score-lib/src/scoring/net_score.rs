use super::{Score, ScoreResult, Weights, measure, normalize};

const LOG_TARGET: &str = " net_score";

pub const NET_SCORE: &str = "NetScore";

/// Fold the sub-metric results into the net score.
///
/// The four weighted sub-metrics are averaged by weight, then gated by the license score.
/// Any suspect input makes the net score suspect with the first anomaly found, checked in
/// argument order.
#[must_use]
pub fn aggregate(
    ramp_up: &ScoreResult,
    correctness: &ScoreResult,
    bus_factor: &ScoreResult,
    responsiveness: &ScoreResult,
    license: &ScoreResult,
    weights: &Weights,
) -> ScoreResult {
    measure(NET_SCORE, || {
        combine(
            ramp_up.value,
            correctness.value,
            bus_factor.value,
            responsiveness.value,
            license.value,
            weights,
        )
    })
}

#[expect(clippy::cast_precision_loss, reason = "the weight total fits in 34 bits")]
fn combine(ramp_up: Score, correctness: Score, bus_factor: Score, responsiveness: Score, license: Score, weights: &Weights) -> Score {
    let inputs = [ramp_up, correctness, bus_factor, responsiveness, license];
    if let Some(anomaly) = inputs.iter().find_map(|s| s.anomaly()) {
        log::debug!(target: LOG_TARGET, "Net score is suspect: {anomaly}");
        return Score::Suspect(anomaly);
    }

    let weighted_sum = f64::from(weights.ramp_up) * ramp_up.as_f64()
        + f64::from(weights.correctness) * correctness.as_f64()
        + f64::from(weights.bus_factor) * bus_factor.as_f64()
        + f64::from(weights.responsiveness) * responsiveness.as_f64();

    match normalize(weighted_sum, weights.total() as f64, 0.0) {
        Score::Valid(normalized) => Score::Valid(license.as_f64() * normalized),
        suspect @ Score::Suspect(_) => suspect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Anomaly;
    use core::time::Duration;

    fn result(value: Score) -> ScoreResult {
        ScoreResult {
            name: "test",
            value,
            latency: Duration::ZERO,
        }
    }

    fn net(values: [Score; 5], weights: &Weights) -> ScoreResult {
        let [r, c, b, m, l] = values.map(result);
        aggregate(&r, &c, &b, &m, &l, weights)
    }

    #[test]
    fn test_all_perfect() {
        let outcome = net([Score::ONE; 5], &Weights::default());
        assert_eq!(outcome.name, "NetScore");
        assert_eq!(outcome.value, Score::ONE);
    }

    #[test]
    fn test_license_gates_everything() {
        let values = [Score::ONE, Score::ONE, Score::ONE, Score::ONE, Score::ZERO];
        assert_eq!(net(values, &Weights::default()).value, Score::ZERO);
    }

    #[test]
    fn test_equal_weights_average() {
        let values = [Score::Valid(0.5), Score::ONE, Score::ZERO, Score::Valid(0.5), Score::ONE];
        assert_eq!(net(values, &Weights::default()).value, Score::Valid(0.5));
    }

    #[test]
    fn test_custom_weights() {
        let weights = Weights {
            ramp_up: 3,
            correctness: 1,
            bus_factor: 0,
            responsiveness: 0,
        };
        let values = [Score::ONE, Score::ZERO, Score::ZERO, Score::ZERO, Score::ONE];
        assert_eq!(net(values, &weights).value, Score::Valid(0.75));
    }

    #[test]
    fn test_any_suspect_input_propagates() {
        for i in 0..5 {
            let mut values = [Score::ONE; 5];
            values[i] = Score::Suspect(Anomaly::MaxTooLow);
            assert_eq!(net(values, &Weights::default()).value, Score::Suspect(Anomaly::MaxTooLow), "input {i}");
        }
    }

    #[test]
    fn test_first_anomaly_wins() {
        let values = [
            Score::ONE,
            Score::Suspect(Anomaly::DegenerateInput),
            Score::Suspect(Anomaly::MaxTooLow),
            Score::ONE,
            Score::ONE,
        ];
        assert_eq!(net(values, &Weights::default()).value, Score::Suspect(Anomaly::DegenerateInput));
    }

    #[test]
    fn test_suspect_with_zero_license_stays_suspect() {
        let values = [Score::Suspect(Anomaly::MaxTooLow), Score::ONE, Score::ONE, Score::ONE, Score::ZERO];
        assert!(net(values, &Weights::default()).value.is_suspect());
    }

    #[test]
    fn test_zero_weights_are_degenerate() {
        let weights = Weights {
            ramp_up: 0,
            correctness: 0,
            bus_factor: 0,
            responsiveness: 0,
        };
        assert_eq!(net([Score::ONE; 5], &weights).value, Score::Suspect(Anomaly::DegenerateInput));
    }

    #[test]
    fn test_huge_weights_do_not_overflow() {
        let weights = Weights {
            ramp_up: u32::MAX,
            correctness: 1,
            bus_factor: 0,
            responsiveness: 0,
        };
        let values = [Score::ONE, Score::ONE, Score::ZERO, Score::ZERO, Score::ONE];
        assert_eq!(net(values, &weights).value, Score::ONE);
    }

    #[test]
    fn test_result_stays_in_unit_range() {
        let steps = [0.0, 0.25, 0.5, 0.75, 1.0];
        for &a in &steps {
            for &b in &steps {
                let values = [Score::Valid(a), Score::Valid(b), Score::Valid(a), Score::Valid(b), Score::Valid(b)];
                let v = net(values, &Weights::default()).value.as_f64();
                assert!((0.0..=1.0).contains(&v), "{a} {b} -> {v}");
            }
        }
    }
}
