//! Command-line interface and orchestration for repo-score
//!
//! This module implements the `repo-score` command and coordinates the other modules to
//! score a list of packages end to end.
//!
//! # Execution Flow
//!
//! The `run` function parses command-line arguments using clap and hands them to the scoring
//! command, which:
//!
//! 1. Sets up logging and loads the configuration
//! 2. Reads the URL file, reporting lines it cannot use
//! 3. Collects repository snapshots through [`crate::facts::Collector`]
//! 4. Scores each snapshot with [`crate::scoring::Scorer`]
//! 5. Writes the records as NDJSON, in input order, to the host output
//!
//! Packages that could not be fetched are listed on the host error stream and make the run
//! fail once all other records have been written.
//!
//! Configuration is managed through a TOML file holding the desired license, the metric
//! weights, and the calibration table.

mod common;
mod config;
mod host;
mod run;
mod score;

pub use common::LogLevel;
pub use config::{CONFIG_FILE_NAME, Config, DEFAULT_CONFIG_TOML};
pub use host::Host;
pub use run::run;
pub use score::{ScoreArgs, process_scores};
