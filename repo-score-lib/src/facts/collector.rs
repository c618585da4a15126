use super::npm::Registry;
use super::url_list::{PackageSource, PackageUrl};
use super::{ProviderResult, RepoSnapshot, RepoSpec};
use crate::Result;
use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;

const LOG_TARGET: &str = " collector";

/// Everything collected for one entry of the URL list.
#[derive(Debug, Clone)]
pub struct PackageFacts {
    pub package: PackageUrl,

    /// The repository the package resolved to, when resolution succeeded.
    pub repo_spec: Option<RepoSpec>,

    pub snapshot: ProviderResult<RepoSnapshot>,
}

/// Collector for gathering repository snapshots for a list of packages
#[derive(Debug)]
pub struct Collector {
    registry: Registry,
    hosting_provider: super::hosting::Provider,
}

impl Collector {
    pub fn new(github_token: Option<&str>, github_api_url: &str, npm_registry_url: &str, max_concurrent: usize) -> Result<Self> {
        Ok(Self {
            registry: Registry::new(npm_registry_url)?,
            hosting_provider: super::hosting::Provider::new(github_token, github_api_url, max_concurrent)?,
        })
    }

    /// Collect snapshots for every package, in input order.
    ///
    /// npm packages are first resolved to their GitHub repositories. Each distinct repository
    /// is fetched once, even when several entries point at it.
    pub async fn collect(&self, packages: impl IntoIterator<Item = PackageUrl>) -> Vec<PackageFacts> {
        let packages: Vec<_> = packages.into_iter().collect();
        if packages.is_empty() {
            return Vec::new();
        }

        let resolved = self.resolve_repositories(&packages).await;

        let mut unique_repos: Vec<RepoSpec> = Vec::new();
        for spec in resolved.iter().filter_map(ProviderResult::as_ref) {
            if !unique_repos.contains(spec) {
                unique_repos.push(spec.clone());
            }
        }

        log::info!(target: LOG_TARGET, "Fetching data for {} distinct repositories", unique_repos.len());
        let snapshots: HashMap<RepoSpec, ProviderResult<RepoSnapshot>> =
            self.hosting_provider.get_snapshots(unique_repos).await.into_iter().collect();

        packages
            .into_iter()
            .zip(resolved)
            .map(|(package, resolution)| match resolution {
                ProviderResult::Found(spec) => {
                    let snapshot = snapshots
                        .get(&spec)
                        .cloned()
                        .unwrap_or_else(|| ProviderResult::Unavailable(format!("repository '{spec}' was not fetched").into()));
                    PackageFacts {
                        package,
                        repo_spec: Some(spec),
                        snapshot,
                    }
                }
                ProviderResult::Unavailable(reason) => PackageFacts {
                    package,
                    repo_spec: None,
                    snapshot: ProviderResult::Unavailable(reason),
                },
                ProviderResult::Error(e) => PackageFacts {
                    package,
                    repo_spec: None,
                    snapshot: ProviderResult::Error(e),
                },
            })
            .collect()
    }

    /// Map every package to its repository, querying the npm registry once per distinct package.
    async fn resolve_repositories(&self, packages: &[PackageUrl]) -> Vec<ProviderResult<RepoSpec>> {
        let mut npm_names: Vec<&str> = packages
            .iter()
            .filter_map(|p| match &p.source {
                PackageSource::Npm(name) => Some(name.as_str()),
                PackageSource::GitHub(_) => None,
            })
            .collect();
        npm_names.sort_unstable();
        npm_names.dedup();

        let lookups = join_all(npm_names.iter().map(|name| self.registry.resolve(name))).await;
        let npm_results: HashMap<&str, ProviderResult<RepoSpec>> = npm_names.into_iter().zip(lookups).collect();

        packages
            .iter()
            .map(|p| match &p.source {
                PackageSource::GitHub(spec) => ProviderResult::Found(spec.clone()),
                PackageSource::Npm(name) => npm_results.get(name.as_str()).cloned().unwrap_or_else(|| {
                    ProviderResult::Error(Arc::new(ohno::app_err!("npm package '{name}' was not looked up")))
                }),
            })
            .inspect(|result| {
                if let ProviderResult::Error(e) = result {
                    log::error!(target: LOG_TARGET, "Could not resolve package repository: {e:#}");
                }
            })
            .collect()
    }
}
