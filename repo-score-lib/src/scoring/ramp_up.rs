use super::calibration::{RAMP_UP_MAX_WORDS, RAMP_UP_MIN_WORDS};
use super::{Calibration, Evaluator, Score, normalize};
use crate::facts::RepoSnapshot;

pub const RAMP_UP: &str = "RampUp";

/// Scores how quickly a newcomer can get going, judged by README size.
#[derive(Debug, Clone, Copy)]
pub struct RampUp {
    min_words: f64,
    max_words: f64,
}

impl RampUp {
    #[must_use]
    pub const fn new(calibration: &Calibration) -> Self {
        Self {
            min_words: calibration.ramp_up_min_words,
            max_words: calibration.ramp_up_max_words,
        }
    }
}

impl Evaluator for RampUp {
    fn name(&self) -> &'static str {
        RAMP_UP
    }

    #[expect(clippy::cast_precision_loss, reason = "word counts are far below 2^52")]
    fn evaluate(&self, snapshot: &RepoSnapshot) -> Score {
        normalize(snapshot.readme_word_count as f64, self.max_words, self.min_words)
    }
}

#[must_use]
#[expect(clippy::cast_precision_loss, reason = "word counts are far below 2^52")]
pub fn evaluate_ramp_up(readme_word_count: u64) -> Score {
    normalize(readme_word_count as f64, RAMP_UP_MAX_WORDS, RAMP_UP_MIN_WORDS)
}
