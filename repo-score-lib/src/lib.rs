#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for repo-score
//!
//! This library consolidates all functionality for the repo-score tool, which scores
//! open-source packages based on the metadata of their source repositories.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`facts`]: Repository data collection from GitHub and the npm registry
//! - [`scoring`]: Normalization, per-metric evaluators, and the net score
//! - [`reports`]: NDJSON record output

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod commands;
pub mod facts;
pub mod reports;
pub mod scoring;

pub use crate::commands::{Host, run};
