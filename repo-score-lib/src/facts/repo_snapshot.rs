use serde::{Deserialize, Serialize};

/// The name GitHub reports for a license file it cannot classify.
const UNCLASSIFIED_LICENSE_NAME: &str = "Other";

/// A single contributor and how many commits they authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub login: String,
    pub commit_count: u64,
}

impl Contributor {
    #[must_use]
    pub fn new(login: impl Into<String>, commit_count: u64) -> Self {
        Self {
            login: login.into(),
            commit_count,
        }
    }
}

/// The license a hosting platform reports for a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum DeclaredLicense {
    /// The platform identified the license.
    Named(String),

    /// The platform found a license file but could not classify it.
    Unclassified,

    /// The platform's license lookup failed, typically because there is no license file.
    Missing,
}

impl DeclaredLicense {
    /// Map the license name reported by the platform to a declared license.
    #[must_use]
    pub fn from_platform_name(name: &str) -> Self {
        if name == UNCLASSIFIED_LICENSE_NAME {
            Self::Unclassified
        } else {
            Self::Named(name.to_string())
        }
    }

    /// Whether the platform failed to give a definitive answer, so the README must be consulted.
    #[must_use]
    pub fn is_inconclusive(&self) -> bool {
        match self {
            Self::Named(name) => name == UNCLASSIFIED_LICENSE_NAME,
            Self::Unclassified | Self::Missing => true,
        }
    }
}

/// Everything the scoring engine needs to know about one repository.
///
/// Snapshots are produced by the collector and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSnapshot {
    pub open_issue_count: u64,
    pub closed_issue_count: u64,
    pub total_commit_count: u64,
    pub days_active: u64,
    pub readme_word_count: u64,
    pub readme_text: String,
    pub declared_license: DeclaredLicense,
    pub contributors: Vec<Contributor>,
}

impl RepoSnapshot {
    #[must_use]
    pub const fn total_issue_count(&self) -> u64 {
        self.open_issue_count.saturating_add(self.closed_issue_count)
    }
}

/// Count the whitespace-separated words in `text`.
#[must_use]
pub fn count_words(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}
