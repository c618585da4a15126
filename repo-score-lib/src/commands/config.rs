use crate::Result;
use crate::scoring::{Calibration, Weights};
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// File looked up in the base directory when no configuration path is given
pub const CONFIG_FILE_NAME: &str = "repo-score.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// License name packages are expected to be distributed under
    #[serde(default = "default_desired_license")]
    pub desired_license: String,

    /// Upper bound on concurrent repository fetches
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    #[serde(default)]
    pub weights: Weights,

    #[serde(default)]
    pub calibration: Calibration,
}

fn default_desired_license() -> String {
    "MIT License".to_string()
}

const fn default_max_concurrent_requests() -> usize {
    5
}

impl Config {
    /// Load configuration from a file or use defaults
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading repo-score configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
                Err(e) => return Err(e).into_app_err_with(|| format!("reading repo-score configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate().map_err(|e| app_err!("invalid configuration file '{final_path}': {e}"))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let c = &self.calibration;

        if self.desired_license.trim().is_empty() {
            return Err(app_err!("desired_license must not be empty"));
        }

        if self.max_concurrent_requests == 0 {
            return Err(app_err!("max_concurrent_requests must be at least 1"));
        }

        if self.weights.total() == 0 {
            return Err(app_err!("at least one weight must be greater than zero"));
        }

        if !(c.ramp_up_min_words.is_finite() && c.ramp_up_max_words.is_finite()) || c.ramp_up_min_words < 0.0 {
            return Err(app_err!(
                "ramp_up_min_words and ramp_up_max_words must be finite and non-negative, got {} and {}",
                c.ramp_up_min_words,
                c.ramp_up_max_words
            ));
        }

        if c.ramp_up_max_words <= c.ramp_up_min_words {
            return Err(app_err!(
                "ramp_up_max_words ({}) must be greater than ramp_up_min_words ({})",
                c.ramp_up_max_words,
                c.ramp_up_min_words
            ));
        }

        if !(c.responsiveness_max_commits_per_month.is_finite() && c.responsiveness_max_commits_per_month > 0.0) {
            return Err(app_err!(
                "responsiveness_max_commits_per_month must be greater than zero, got {}",
                c.responsiveness_max_commits_per_month
            ));
        }

        for (name, share) in [
            ("bus_factor_majority_share", c.bus_factor_majority_share),
            ("bus_factor_healthy_share", c.bus_factor_healthy_share),
        ] {
            if !(share > 0.0 && share <= 1.0) {
                return Err(app_err!("{name} must be in (0, 1], got {share}"));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
