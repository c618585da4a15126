use super::{Evaluator, Score};
use crate::Result;
use crate::facts::{DeclaredLicense, RepoSnapshot};
use ohno::IntoAppError;
use regex::{Regex, RegexBuilder};

const LOG_TARGET: &str = "   license";

pub const LICENSE: &str = "License";

/// Checks whether a repository is distributed under the desired license.
///
/// The platform's declared license wins when it names a license. When the platform could not
/// classify the license, or has none on record, the README is searched for the desired
/// license name instead.
#[derive(Debug, Clone)]
pub struct License {
    desired: String,
    readme_pattern: Regex,
}

impl License {
    /// # Errors
    ///
    /// Returns an error if the license name cannot be turned into a search pattern.
    pub fn new(desired: impl Into<String>) -> Result<Self> {
        let desired = desired.into();
        let readme_pattern = build_pattern(&desired)?;
        Ok(Self { desired, readme_pattern })
    }

    fn check(&self, declared: &DeclaredLicense, readme_text: &str) -> Score {
        if let DeclaredLicense::Named(name) = declared
            && *name == self.desired
        {
            return Score::ONE;
        }

        if declared.is_inconclusive() {
            let found = self.readme_pattern.is_match(readme_text);
            log::debug!(target: LOG_TARGET, "License '{}' {} in README", self.desired, if found { "found" } else { "not found" });
            return if found { Score::ONE } else { Score::ZERO };
        }

        Score::ZERO
    }
}

impl Evaluator for License {
    fn name(&self) -> &'static str {
        LICENSE
    }

    fn evaluate(&self, snapshot: &RepoSnapshot) -> Score {
        self.check(&snapshot.declared_license, &snapshot.readme_text)
    }
}

/// Score license compliance without keeping a reusable evaluator around.
///
/// A license name that cannot form a search pattern never matches the README.
#[must_use]
pub fn evaluate_license(desired: &str, declared: &DeclaredLicense, readme_text: &str) -> Score {
    License::new(desired).map_or(Score::ZERO, |license| license.check(declared, readme_text))
}

fn build_pattern(desired: &str) -> Result<Regex> {
    RegexBuilder::new(&regex::escape(desired))
        .case_insensitive(true)
        .build()
        .into_app_err_with(|| format!("unable to build a README search pattern for license '{desired}'"))
}
