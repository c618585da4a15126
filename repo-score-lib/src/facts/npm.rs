//! Resolution of npm packages to their GitHub repositories
//!
//! The registry document of a package carries a `repository` field that is either a bare
//! string or an object with a `url`. Both forms come in many shapes (`git+https://`,
//! `git@github.com:`, `github:` shorthand, plain `owner/repo`), which are normalized here to
//! a GitHub repository URL.

use super::{ProviderResult, RepoSpec};
use crate::Result;
use ohno::{EnrichableExt, IntoAppError};
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;

const LOG_TARGET: &str = "       npm";
const USER_AGENT: &str = "repo-score";
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

#[derive(Debug, Deserialize)]
struct PackageDocument {
    repository: Option<RepositoryField>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RepositoryField {
    Url(String),
    Object { url: Option<String> },
}

impl RepositoryField {
    fn url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            Self::Object { url } => url.as_deref(),
        }
    }
}

/// Client for the npm registry.
#[derive(Debug, Clone)]
pub struct Registry {
    client: reqwest::Client,
    base_url: String,
}

impl Registry {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().user_agent(USER_AGENT).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Look up the GitHub repository of an npm package.
    pub async fn resolve(&self, package: &str) -> ProviderResult<RepoSpec> {
        match self.fetch_repository_url(package).await {
            Ok(Some(raw)) => match github_url_from_repository(&raw) {
                Some(url) => match RepoSpec::parse_str(&url) {
                    Ok(spec) => {
                        log::debug!(target: LOG_TARGET, "Resolved npm package '{package}' to '{spec}'");
                        ProviderResult::Found(spec)
                    }
                    Err(e) => ProviderResult::Error(Arc::new(e.enrich_with(|| format!("resolving npm package '{package}'")))),
                },
                None => ProviderResult::Unavailable(format!("npm package '{package}' is not hosted on GitHub ({raw})").into()),
            },
            Ok(None) => ProviderResult::Unavailable(format!("npm package '{package}' does not declare a repository").into()),
            Err(e) => ProviderResult::Error(Arc::new(e)),
        }
    }

    /// Returns `Ok(None)` when the package exists but declares no repository.
    async fn fetch_repository_url(&self, package: &str) -> Result<Option<String>> {
        let url = format!("{}/{}", self.base_url, package.replace('/', "%2F"));
        log::info!(target: LOG_TARGET, "Querying npm registry for package '{package}'");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .into_app_err_with(|| format!("requesting npm package '{package}'"))?;

        if resp.status() == StatusCode::NOT_FOUND {
            ohno::bail!("npm package '{package}' not found");
        }

        let document: PackageDocument = resp
            .error_for_status()
            .into_app_err_with(|| format!("requesting npm package '{package}'"))?
            .json()
            .await
            .into_app_err_with(|| format!("decoding registry document for npm package '{package}'"))?;

        Ok(document.repository.as_ref().and_then(RepositoryField::url).map(str::to_string))
    }
}

/// Normalize an npm `repository` value to `https://github.com/owner/repo`.
///
/// Returns `None` for repositories hosted anywhere other than GitHub.
#[must_use]
pub fn github_url_from_repository(raw: &str) -> Option<String> {
    let raw = raw.trim();

    let path = if let Some(rest) = raw.strip_prefix("github:") {
        rest
    } else if let Some(rest) = raw.strip_prefix("git@github.com:") {
        rest
    } else if let Some((_, rest)) = raw.split_once("://") {
        let rest = rest.strip_prefix("git@").unwrap_or(rest);
        let (host, path) = rest.split_once(['/', ':'])?;
        let host = host.to_ascii_lowercase();
        if host != "github.com" && host != "www.github.com" {
            return None;
        }
        path
    } else if !raw.contains(':') && raw.split('/').count() == 2 {
        // `owner/repo` shorthand defaults to GitHub
        raw
    } else {
        return None;
    };

    let mut segments = path.trim_start_matches('/').split('/');
    let owner = segments.next().filter(|s| !s.is_empty())?;
    let repo = segments.next().filter(|s| !s.is_empty())?;
    let repo = repo.split(['#', '?']).next().unwrap_or(repo);
    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    Some(format!("https://github.com/{owner}/{repo}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_forms() {
        let cases = [
            ("git+https://github.com/expressjs/express.git", "https://github.com/expressjs/express"),
            ("https://github.com/lodash/lodash", "https://github.com/lodash/lodash"),
            ("git://github.com/browserify/browserify.git", "https://github.com/browserify/browserify"),
            ("git+ssh://git@github.com/npm/cli.git", "https://github.com/npm/cli"),
            ("ssh://git@github.com:npm/cli.git", "https://github.com/npm/cli"),
            ("git@github.com:facebook/react.git", "https://github.com/facebook/react"),
            ("github:sindresorhus/got", "https://github.com/sindresorhus/got"),
            ("chalk/chalk", "https://github.com/chalk/chalk"),
            ("https://github.com/babel/babel.git#main", "https://github.com/babel/babel"),
            ("https://github.com/DefinitelyTyped/DefinitelyTyped/tree/master/types/node", "https://github.com/DefinitelyTyped/DefinitelyTyped"),
        ];

        for (raw, expected) in cases {
            assert_eq!(github_url_from_repository(raw).as_deref(), Some(expected), "{raw}");
        }
    }

    #[test]
    fn test_non_github_repositories() {
        for raw in [
            "https://gitlab.com/gitlab-org/gitlab.git",
            "git+https://bitbucket.org/atlassian/pipelines.git",
            "gitlab:owner/repo",
            "https://github.com/only-owner",
            "",
        ] {
            assert_eq!(github_url_from_repository(raw), None, "{raw}");
        }
    }

    #[test]
    fn test_repository_field_shapes() {
        let doc: PackageDocument = serde_json::from_str(r#"{"repository": "github:a/b"}"#).unwrap();
        assert_eq!(doc.repository.as_ref().and_then(RepositoryField::url), Some("github:a/b"));

        let doc: PackageDocument = serde_json::from_str(r#"{"repository": {"type": "git", "url": "git+https://github.com/a/b.git"}}"#).unwrap();
        assert_eq!(doc.repository.as_ref().and_then(RepositoryField::url), Some("git+https://github.com/a/b.git"));

        let doc: PackageDocument = serde_json::from_str(r#"{"name": "x"}"#).unwrap();
        assert!(doc.repository.is_none());
    }
}
