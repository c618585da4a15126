//! Data collection for package repositories
//!
//! This module gathers the raw repository facts the scoring engine works from. Packages are
//! listed in a URL file; npm packages are resolved to their GitHub repositories through the
//! npm registry, and every repository is then queried through the GitHub REST API.
//!
//! # Implementation Model
//!
//! The core type is [`RepoSnapshot`], holding issue counts, commit history, contributor
//! distribution, README text, and the declared license of one repository.
//!
//! Each fetch outcome is wrapped in a [`ProviderResult`] which can be `Found`,
//! `Unavailable`, or `Error`, so that one broken repository does not stop the others.
//!
//! The [`Collector`] orchestrates the work: it resolves npm packages, deduplicates
//! repositories, and fetches them concurrently. Concurrency is bounded by a throttler that
//! also pauses all requests when GitHub reports a rate limit.

mod collector;
pub(crate) mod hosting;
pub mod npm;
mod provider_result;
mod repo_snapshot;
mod repo_spec;
mod throttler;
mod url_list;

pub use collector::{Collector, PackageFacts};
pub use provider_result::ProviderResult;
pub use repo_snapshot::{Contributor, DeclaredLicense, RepoSnapshot, count_words};
pub use repo_spec::RepoSpec;
pub use url_list::{PackageSource, PackageUrl, RejectedLine, UrlList};
