//! GitHub REST API client
//!
//! Thin wrapper around `reqwest` that authenticates requests and classifies every response
//! as success, rate limited, not found, or failed.

use chrono::{DateTime, Utc};
use ohno::app_err;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;

const USER_AGENT: &str = "repo-score";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw+json";
const DEFAULT_RATE_LIMIT_WAIT_HOURS: i64 = 1;

#[derive(Debug, Deserialize)]
pub struct Repository {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct LicenseResponse {
    pub license: Option<LicenseName>,
}

#[derive(Debug, Deserialize)]
pub struct LicenseName {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ContributorResponse {
    /// Absent for anonymous contributors.
    pub login: Option<String>,
    pub contributions: u64,
}

/// Minimal issue info; GitHub lists pull requests as issues carrying a `pull_request` key
#[derive(Debug, Deserialize)]
pub struct Issue {
    pub state: IssueState,
    pub pull_request: Option<serde::de::IgnoredAny>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// Rate limit information from response headers
#[derive(Debug, Clone, Copy)]
pub struct RateLimitInfo {
    pub remaining: usize,
    pub reset_at: DateTime<Utc>,
}

/// Result of a hosting API call
pub enum HostingApiResult<T> {
    /// Request succeeded - contains data and optional rate limit info
    Success(T, Option<RateLimitInfo>),

    /// Rate limited - should retry after reset time
    RateLimited(RateLimitInfo),

    /// The requested resource does not exist or has no content to offer
    NotFound(Option<RateLimitInfo>),

    /// Request failed permanently - should NOT retry
    Failed(ohno::AppError, Option<RateLimitInfo>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Json,
    Raw,
}

#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct Client {
    client: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Create a new GitHub API client with an optional authentication token
    pub fn new(token: Option<&str>, base_url: impl Into<String>) -> crate::Result<Self> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));

        if let Some(t) = token {
            let mut auth_val = HeaderValue::from_str(&format!("token {t}"))?;
            auth_val.set_sensitive(true);
            let _ = headers.insert(AUTHORIZATION, auth_val);
        }

        let client = reqwest::Client::builder().user_agent(USER_AGENT).default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make an API call and classify the result
    pub async fn api_call(&self, url: &str, media_type: MediaType) -> HostingApiResult<reqwest::Response> {
        let mut request = self.client.get(url);
        if media_type == MediaType::Raw {
            request = request.header(ACCEPT, RAW_MEDIA_TYPE);
        }

        let resp = match request.send().await {
            Ok(r) => r,
            Err(e) => return HostingApiResult::Failed(e.into(), None),
        };

        let rate_limit = extract_rate_limit_from_headers(resp.headers());

        let status = resp.status();
        if status.is_success() {
            return HostingApiResult::Success(resp, rate_limit);
        }

        if is_rate_limited(status, rate_limit.as_ref()) {
            let rate_limit = rate_limit.unwrap_or_else(|| RateLimitInfo {
                remaining: 0,
                reset_at: Utc::now() + chrono::Duration::hours(DEFAULT_RATE_LIMIT_WAIT_HOURS),
            });
            return HostingApiResult::RateLimited(rate_limit);
        }

        // 409 is what GitHub answers for commit listings of an empty repository
        if matches!(status, StatusCode::NOT_FOUND | StatusCode::CONFLICT) {
            return HostingApiResult::NotFound(rate_limit);
        }

        let error = match resp.error_for_status() {
            Err(e) => e.into(),
            Ok(_) => app_err!("unexpected HTTP status {status} from {url}"),
        };
        HostingApiResult::Failed(error, rate_limit)
    }
}

/// GitHub answers 403 for access problems too, so a 403 only counts as a rate limit when the
/// quota is exhausted or the rate limit headers are missing altogether.
fn is_rate_limited(status: StatusCode, rate_limit: Option<&RateLimitInfo>) -> bool {
    match status {
        StatusCode::TOO_MANY_REQUESTS => true,
        StatusCode::FORBIDDEN => rate_limit.is_none_or(|rl| rl.remaining == 0),
        _ => false,
    }
}

/// Extract rate limit information from API response headers
fn extract_rate_limit_from_headers(headers: &HeaderMap) -> Option<RateLimitInfo> {
    let remaining = headers.get("x-ratelimit-remaining")?.to_str().ok()?.parse::<usize>().ok()?;
    let reset_timestamp = headers.get("x-ratelimit-reset")?.to_str().ok()?.parse::<i64>().ok()?;
    let reset_at = DateTime::from_timestamp(reset_timestamp, 0)?;

    Some(RateLimitInfo { remaining, reset_at })
}
