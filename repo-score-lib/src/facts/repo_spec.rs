use crate::Result;
use core::fmt::{Display, Formatter};
use ohno::{IntoAppError, bail};
use std::sync::Arc;
use url::Url;

/// A repository identified by its host, owner, and name.
///
/// Two URLs that point into the same repository (a subdirectory, a branch, a `.git` clone
/// URL) produce equal specs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSpec {
    url: Arc<Url>,
    host: Arc<str>,
    owner: Arc<str>,
    repo: Arc<str>,
}

impl RepoSpec {
    /// # Errors
    ///
    /// Returns an error if the URL has no host or lacks an owner and repository segment.
    pub fn parse(url: &Url) -> Result<Self> {
        let Some(host) = url.host_str() else {
            bail!("repository URL has no host: {url}");
        };

        let mut segments = url.path_segments().into_iter().flatten();
        let owner = segments.next().unwrap_or_default();
        let repo = segments.next().unwrap_or_default();
        let repo = repo.strip_suffix(".git").unwrap_or(repo);

        if owner.is_empty() || repo.is_empty() {
            bail!("repository URL must name an owner and a repository: {url}");
        }

        let clean_url = Url::parse(&format!("https://{host}/{owner}/{repo}"))
            .into_app_err_with(|| format!("rebuilding repository URL from {url}"))?;

        Ok(Self {
            host: Arc::from(host.to_ascii_lowercase()),
            owner: Arc::from(owner),
            repo: Arc::from(repo),
            url: Arc::new(clean_url),
        })
    }

    /// # Errors
    ///
    /// Returns an error if `text` is not a URL or does not name a repository.
    pub fn parse_str(text: &str) -> Result<Self> {
        let url = Url::parse(text.trim()).into_app_err_with(|| format!("invalid URL '{text}'"))?;
        Self::parse(&url)
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }

    #[must_use]
    pub fn is_github(&self) -> bool {
        self.host.as_ref() == "github.com" || self.host.as_ref() == "www.github.com"
    }
}

impl Display for RepoSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
