//! Parsing of the package URL list
//!
//! The list holds one URL per line. Blank lines and lines starting with `#` are ignored.
//! GitHub repository URLs are used directly; npm package pages are resolved to their
//! repository later. Anything else is rejected with a reason.

use super::RepoSpec;
use crate::Result;
use camino::Utf8Path;
use core::fmt::{Display, Formatter};
use ohno::IntoAppError;
use url::Url;

const LOG_TARGET: &str = "  url_list";
const NPM_HOSTS: &[&str] = &["www.npmjs.com", "npmjs.com"];

/// Where a package's repository can be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageSource {
    GitHub(RepoSpec),

    /// An npm package name, possibly scoped (`@scope/name`).
    Npm(String),
}

/// One accepted line of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageUrl {
    /// The line as written, trimmed of surrounding whitespace.
    pub raw: String,
    pub source: PackageSource,
}

/// A line that could not be turned into a package source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based line number.
    pub line: usize,
    pub text: String,
    pub reason: String,
}

impl Display for RejectedLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "line {}: '{}': {}", self.line, self.text, self.reason)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlList {
    pub entries: Vec<PackageUrl>,
    pub rejected: Vec<RejectedLine>,
}

impl UrlList {
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut list = Self::default();

        for (index, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            match parse_line(trimmed) {
                Ok(source) => list.entries.push(PackageUrl {
                    raw: trimmed.to_string(),
                    source,
                }),
                Err(reason) => {
                    log::warn!(target: LOG_TARGET, "Skipping line {}: '{trimmed}': {reason}", index + 1);
                    list.rejected.push(RejectedLine {
                        line: index + 1,
                        text: trimmed.to_string(),
                        reason,
                    });
                }
            }
        }

        log::info!(
            target: LOG_TARGET,
            "Read {} package URL(s), rejected {} line(s)",
            list.entries.len(),
            list.rejected.len()
        );

        list
    }

    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).into_app_err_with(|| format!("reading URL file '{path}'"))?;
        Ok(Self::parse(&text))
    }
}

fn parse_line(text: &str) -> Result<PackageSource, String> {
    let url = Url::parse(text).map_err(|e| format!("not a valid URL: {e}"))?;
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();

    if NPM_HOSTS.contains(&host.as_str()) {
        return npm_package_name(&url).map(PackageSource::Npm);
    }

    let spec = RepoSpec::parse(&url).map_err(|e| e.to_string())?;
    if spec.is_github() {
        Ok(PackageSource::GitHub(spec))
    } else {
        Err(format!("unsupported host '{host}'"))
    }
}

fn npm_package_name(url: &Url) -> Result<String, String> {
    let segments: Vec<&str> = url.path_segments().into_iter().flatten().filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        ["package", scope, name, ..] if scope.starts_with('@') && scope.len() > 1 => Ok(format!("{scope}/{name}")),
        ["package", name, ..] if !name.starts_with('@') => Ok((*name).to_string()),
        _ => Err("npm URL does not name a package".to_string()),
    }
}
