use super::client::{Client, ContributorResponse, HostingApiResult, Issue, IssueState, LicenseResponse, MediaType, RateLimitInfo, Repository};
use crate::Result;
use crate::facts::repo_snapshot::{Contributor, DeclaredLicense, RepoSnapshot, count_words};
use crate::facts::throttler::Throttler;
use crate::facts::{ProviderResult, RepoSpec};
use chrono::{DateTime, Utc};
use core::time::Duration;
use futures_util::future::join_all;
use ohno::{EnrichableExt, app_err};
use regex::Regex;
use reqwest::header::{HeaderMap, LINK};
use serde::de::IgnoredAny;
use std::sync::{Arc, LazyLock};

const LOG_TARGET: &str = "   hosting";
const SECONDS_PER_DAY: u64 = 86_400;
const PAGE_SIZE: u8 = 100;
const MAX_ISSUE_PAGES: u32 = 10;
const MAX_CONTRIBUTOR_PAGES: u32 = 5;
const MAX_RATE_LIMIT_WAIT_SECS: i64 = 3600;
const MAX_RATE_LIMIT_RETRIES: u32 = 5;
const ANONYMOUS_LOGIN: &str = "anonymous";

static LAST_PAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[?&]page=(\d+)[^>]*>;\s*rel="last""#).expect("invalid regex"));

/// Macro to unwrap `HostingApiResult` or propagate rate limit/not found/error
macro_rules! unwrap_or_return {
    ($expr:expr) => {
        match $expr {
            HostingApiResult::Success(data, rate_limit) => (data, rate_limit),
            HostingApiResult::RateLimited(rate_limit) => return HostingApiResult::RateLimited(rate_limit),
            HostingApiResult::NotFound(rate_limit) => return HostingApiResult::NotFound(rate_limit),
            HostingApiResult::Failed(e, rate_limit) => return HostingApiResult::Failed(e, rate_limit),
        }
    };
}

/// Like `unwrap_or_return`, but treats a missing resource as the given fallback value
macro_rules! unwrap_or_fallback {
    ($expr:expr, $fallback:expr) => {
        match $expr {
            HostingApiResult::Success(data, rate_limit) => (data, rate_limit),
            HostingApiResult::NotFound(rate_limit) => ($fallback, rate_limit),
            HostingApiResult::RateLimited(rate_limit) => return HostingApiResult::RateLimited(rate_limit),
            HostingApiResult::Failed(e, rate_limit) => return HostingApiResult::Failed(e, rate_limit),
        }
    };
}

/// Fetches repository snapshots from the GitHub REST API.
#[derive(Debug)]
pub struct Provider {
    client: Client,
    throttler: Throttler,
}

impl Provider {
    pub fn new(github_token: Option<&str>, base_url: &str, max_concurrent: usize) -> Result<Self> {
        Ok(Self {
            client: Client::new(github_token, base_url)?,
            throttler: Throttler::new(max_concurrent),
        })
    }

    /// Fetch snapshots for all given repositories concurrently, preserving input order.
    pub async fn get_snapshots(&self, repos: impl IntoIterator<Item = RepoSpec>) -> Vec<(RepoSpec, ProviderResult<RepoSnapshot>)> {
        let futures = repos.into_iter().map(|repo_spec| self.fetch_with_retry(repo_spec));
        let results = join_all(futures).await;

        for (repo_spec, result) in &results {
            match result {
                ProviderResult::Error(e) => log::error!(target: LOG_TARGET, "Could not fetch data for repository '{repo_spec}': {e:#}"),
                ProviderResult::Unavailable(reason) => log::warn!(target: LOG_TARGET, "Data unavailable for repository '{repo_spec}': {reason}"),
                ProviderResult::Found(_) => {}
            }
        }

        results
    }

    /// Fetch the snapshot for a repository, retrying on rate limits.
    ///
    /// Acquires a throttler permit before each attempt. On rate limit, pauses the throttler
    /// for all concurrent tasks until the limit resets, then retries.
    async fn fetch_with_retry(&self, repo_spec: RepoSpec) -> (RepoSpec, ProviderResult<RepoSnapshot>) {
        let mut retries = 0;

        loop {
            let _permit = match self.throttler.acquire().await {
                Ok(permit) => permit,
                Err(e) => return (repo_spec, ProviderResult::Error(Arc::new(e))),
            };

            let rate_limit = match self.fetch_snapshot(&repo_spec).await {
                HostingApiResult::Success(snapshot, rate_limit) => {
                    if let Some(rl) = rate_limit {
                        log::debug!(target: LOG_TARGET, "GitHub API quota after '{repo_spec}': {} request(s) remaining", rl.remaining);
                    }
                    return (repo_spec, ProviderResult::Found(snapshot));
                }
                HostingApiResult::NotFound(_) => {
                    let reason = format!("repository '{repo_spec}' not found");
                    return (repo_spec, ProviderResult::Unavailable(reason.into()));
                }
                HostingApiResult::Failed(e, _) => {
                    let error = e.enrich_with(|| format!("fetching repository data for '{repo_spec}'"));
                    return (repo_spec, ProviderResult::Error(Arc::new(error)));
                }
                HostingApiResult::RateLimited(rate_limit) => rate_limit,
            };

            retries += 1;
            if retries > MAX_RATE_LIMIT_RETRIES {
                let error = app_err!("GitHub rate limit still in effect after {MAX_RATE_LIMIT_RETRIES} retries for '{repo_spec}'");
                return (repo_spec, ProviderResult::Error(Arc::new(error)));
            }

            self.pause_until_reset(&repo_spec, rate_limit);
        }
    }

    fn pause_until_reset(&self, repo_spec: &RepoSpec, rate_limit: RateLimitInfo) {
        let Some(wait_duration) = rate_limit_wait(rate_limit.reset_at, Utc::now()) else {
            return;
        };

        if self.throttler.pause_for(wait_duration) {
            log::warn!(
                target: LOG_TARGET,
                "Hit GitHub rate limit while fetching '{repo_spec}', waiting {}s",
                wait_duration.as_secs()
            );
        }
    }

    /// Fetch everything needed for one snapshot.
    ///
    /// Requests run sequentially so each throttler permit covers at most one in-flight call.
    async fn fetch_snapshot(&self, repo_spec: &RepoSpec) -> HostingApiResult<RepoSnapshot> {
        let owner = repo_spec.owner();
        let repo = repo_spec.repo();

        log::info!(target: LOG_TARGET, "Querying GitHub for information on repository '{}'", repo_spec.url());

        let (days_active, rl_repo) = unwrap_or_return!(self.get_days_active(owner, repo).await);
        let (readme_text, rl_readme) = unwrap_or_fallback!(self.get_readme(owner, repo).await, String::new());
        let (declared_license, rl_license) = unwrap_or_fallback!(self.get_license(owner, repo).await, DeclaredLicense::Missing);
        let (total_commit_count, rl_commits) = unwrap_or_fallback!(self.get_commit_count(owner, repo).await, 0);
        let (contributors, rl_contributors) = unwrap_or_fallback!(self.get_contributors(owner, repo).await, Vec::new());
        let ((open_issue_count, closed_issue_count), rl_issues) =
            unwrap_or_fallback!(self.get_issue_counts(owner, repo).await, (0, 0));

        // Keep the most conservative rate limit info
        let rate_limit = [rl_repo, rl_readme, rl_license, rl_commits, rl_contributors, rl_issues]
            .into_iter()
            .flatten()
            .min_by_key(|rl| rl.remaining);

        log::debug!(
            target: LOG_TARGET,
            "'{repo_spec}': {days_active} day(s) active, {total_commit_count} commit(s), {} contributor(s), {open_issue_count} open and {closed_issue_count} closed issue(s)",
            contributors.len()
        );

        let snapshot = RepoSnapshot {
            open_issue_count,
            closed_issue_count,
            total_commit_count,
            days_active,
            readme_word_count: count_words(&readme_text),
            readme_text,
            declared_license,
            contributors,
        };

        HostingApiResult::Success(snapshot, rate_limit)
    }

    /// Construct API URL for a repository with optional path suffix
    fn repo_url(&self, owner: &str, repo: &str, suffix: &str) -> String {
        format!("{}/repos/{owner}/{repo}{suffix}", self.client.base_url())
    }

    async fn get_days_active(&self, owner: &str, repo: &str) -> HostingApiResult<u64> {
        let url = self.repo_url(owner, repo, "");

        let (resp, rate_limit) = unwrap_or_return!(self.client.api_call(&url, MediaType::Json).await);
        match resp.json::<Repository>().await {
            Ok(info) => {
                let seconds = (info.updated_at - info.created_at).num_seconds().max(0).cast_unsigned();
                HostingApiResult::Success(seconds.div_ceil(SECONDS_PER_DAY), rate_limit)
            }
            Err(e) => HostingApiResult::Failed(e.into(), rate_limit),
        }
    }

    async fn get_readme(&self, owner: &str, repo: &str) -> HostingApiResult<String> {
        let url = self.repo_url(owner, repo, "/readme");

        let (resp, rate_limit) = unwrap_or_return!(self.client.api_call(&url, MediaType::Raw).await);
        match resp.text().await {
            Ok(text) => HostingApiResult::Success(text, rate_limit),
            Err(e) => HostingApiResult::Failed(e.into(), rate_limit),
        }
    }

    async fn get_license(&self, owner: &str, repo: &str) -> HostingApiResult<DeclaredLicense> {
        let url = self.repo_url(owner, repo, "/license");

        let (resp, rate_limit) = unwrap_or_return!(self.client.api_call(&url, MediaType::Json).await);
        match resp.json::<LicenseResponse>().await {
            Ok(LicenseResponse { license: Some(license) }) => {
                HostingApiResult::Success(DeclaredLicense::from_platform_name(&license.name), rate_limit)
            }
            Ok(LicenseResponse { license: None }) => HostingApiResult::Success(DeclaredLicense::Unclassified, rate_limit),
            Err(e) => HostingApiResult::Failed(e.into(), rate_limit),
        }
    }

    /// Count commits by requesting single-commit pages and reading the last page number.
    async fn get_commit_count(&self, owner: &str, repo: &str) -> HostingApiResult<u64> {
        let url = self.repo_url(owner, repo, "/commits?per_page=1");

        let (resp, rate_limit) = unwrap_or_return!(self.client.api_call(&url, MediaType::Json).await);
        if let Some(last_page) = last_page(resp.headers()) {
            return HostingApiResult::Success(last_page, rate_limit);
        }

        match resp.json::<Vec<IgnoredAny>>().await {
            Ok(commits) => HostingApiResult::Success(commits.len() as u64, rate_limit),
            Err(e) => HostingApiResult::Failed(e.into(), rate_limit),
        }
    }

    async fn get_contributors(&self, owner: &str, repo: &str) -> HostingApiResult<Vec<Contributor>> {
        let mut contributors = Vec::new();
        let mut latest_rate_limit: Option<RateLimitInfo> = None;
        let mut page_num = 1u32;

        loop {
            let url = self.repo_url(owner, repo, &format!("/contributors?per_page={PAGE_SIZE}&page={page_num}"));
            let (resp, rate_limit) = unwrap_or_return!(self.client.api_call(&url, MediaType::Json).await);
            latest_rate_limit = [latest_rate_limit, rate_limit].into_iter().flatten().min_by_key(|rl| rl.remaining);

            // GitHub answers 204 when the contributor list is too large to compute or empty
            if resp.status() == reqwest::StatusCode::NO_CONTENT {
                break;
            }

            let more = has_next_page(resp.headers());
            let page: Vec<ContributorResponse> = match resp.json().await {
                Ok(page) => page,
                Err(e) => return HostingApiResult::Failed(e.into(), latest_rate_limit),
            };

            if page.is_empty() {
                break;
            }

            contributors.extend(page.into_iter().map(|c| Contributor {
                login: c.login.unwrap_or_else(|| ANONYMOUS_LOGIN.to_string()),
                commit_count: c.contributions,
            }));

            if !more {
                break;
            }

            page_num += 1;
            if page_num > MAX_CONTRIBUTOR_PAGES {
                log::debug!(target: LOG_TARGET, "Reached maximum contributor page limit ({MAX_CONTRIBUTOR_PAGES}) for '{owner}/{repo}'");
                break;
            }
        }

        HostingApiResult::Success(contributors, latest_rate_limit)
    }

    /// Count open and closed issues, excluding pull requests.
    async fn get_issue_counts(&self, owner: &str, repo: &str) -> HostingApiResult<(u64, u64)> {
        let mut open = 0u64;
        let mut closed = 0u64;
        let mut latest_rate_limit: Option<RateLimitInfo> = None;
        let mut page_num = 1u32;

        loop {
            let url = self.repo_url(owner, repo, &format!("/issues?state=all&per_page={PAGE_SIZE}&page={page_num}"));
            let (resp, rate_limit) = unwrap_or_return!(self.client.api_call(&url, MediaType::Json).await);
            latest_rate_limit = [latest_rate_limit, rate_limit].into_iter().flatten().min_by_key(|rl| rl.remaining);

            let more = has_next_page(resp.headers());
            let issues: Vec<Issue> = match resp.json().await {
                Ok(issues) => issues,
                Err(e) => return HostingApiResult::Failed(e.into(), latest_rate_limit),
            };

            if issues.is_empty() {
                break;
            }

            for issue in issues.iter().filter(|i| i.pull_request.is_none()) {
                match issue.state {
                    IssueState::Open => open += 1,
                    IssueState::Closed => closed += 1,
                }
            }

            if !more {
                break;
            }

            // Stop paginating if another task detected a rate limit. A reset time of now keeps
            // the retry from extending the existing pause.
            if self.throttler.is_paused() {
                return HostingApiResult::RateLimited(RateLimitInfo {
                    remaining: 0,
                    reset_at: Utc::now(),
                });
            }

            page_num += 1;
            if page_num > MAX_ISSUE_PAGES {
                log::debug!(target: LOG_TARGET, "Reached maximum issue page limit ({MAX_ISSUE_PAGES}) for '{owner}/{repo}', counted {} issue(s)", open + closed);
                break;
            }
        }

        HostingApiResult::Success((open, closed), latest_rate_limit)
    }
}

/// How long to wait for a rate limit resetting at `reset_at`, capped at one hour.
///
/// Returns `None` when the reset time has already passed.
fn rate_limit_wait(reset_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<Duration> {
    let wait_until = reset_at.min(now + chrono::Duration::seconds(MAX_RATE_LIMIT_WAIT_SECS));
    if wait_until <= now {
        return None;
    }

    (wait_until - now).to_std().ok()
}

fn link_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(LINK).and_then(|h| h.to_str().ok())
}

fn has_next_page(headers: &HeaderMap) -> bool {
    link_header(headers).is_some_and(|link| link.contains(r#"rel="next""#))
}

fn last_page(headers: &HeaderMap) -> Option<u64> {
    let link = link_header(headers)?;
    LAST_PAGE_REGEX.captures(link)?.get(1)?.as_str().parse().ok()
}
