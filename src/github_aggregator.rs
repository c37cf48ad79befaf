use chrono::{DateTime, Utc};
use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::header::HeaderMap;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::AggregatorConfig;
use crate::error::{error_chain, AggregateError, UpstreamFailure};
use crate::models::{
    AggregationResult, Candidate, EnrichedUser, ProjectSummary, Query, RawRepository,
    UserSearchResponse,
};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Searches GitHub users and enriches each hit with its latest repositories.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct GitHubAggregator {
    client: Client,
    config: AggregatorConfig,
}

impl GitHubAggregator {
    /// Create a new GitHubAggregator instance
    pub fn new(config: AggregatorConfig) -> Result<Self, reqwest::Error> {
        let client = config.build_client()?;
        Ok(GitHubAggregator { client, config })
    }

    /// Run the user search, then list repositories for every hit concurrently.
    ///
    /// The result keeps the search ranking no matter which listing finishes
    /// first. The first failing call fails the whole aggregation and the
    /// listings still in flight are dropped.
    pub async fn aggregate(&self, query: &Query) -> Result<AggregationResult, AggregateError> {
        let candidates = self.lookup(query).await?;
        if candidates.is_empty() {
            info!("No users matched '{}'", query);
            return Ok(Vec::new());
        }

        debug!("Fetching repositories for {} users", candidates.len());
        let mut slots: Vec<Option<Vec<ProjectSummary>>> = vec![None; candidates.len()];
        {
            let mut pending: FuturesUnordered<_> = candidates
                .iter()
                .enumerate()
                .map(|(index, candidate)| async move {
                    (index, self.fetch_projects(&candidate.login).await)
                })
                .collect();

            while let Some((index, outcome)) = pending.next().await {
                match outcome {
                    Ok(repos) => slots[index] = Some(repos),
                    Err(e) => {
                        error!("Aggregation for '{}' failed: {}", query, error_chain(&e));
                        return Err(e);
                    }
                }
            }
        }

        let users: AggregationResult = candidates
            .into_iter()
            .zip(slots)
            .map(|(candidate, repos)| EnrichedUser {
                username: candidate.login,
                repos: repos.unwrap_or_default(),
            })
            .collect();

        info!("Aggregated {} users for '{}'", users.len(), query);
        Ok(users)
    }

    /// Search users, keeping at most `max_users` hits in relevance order.
    pub async fn lookup(&self, query: &Query) -> Result<Vec<Candidate>, AggregateError> {
        let mut url = self.config.search_url.clone();
        url.query_pairs_mut().append_pair("q", query.as_str());

        let response: UserSearchResponse = self.get_json(url).await.map_err(|e| {
            warn!("User search for '{}' failed: {}", query, error_chain(&e));
            AggregateError::lookup(e)
        })?;

        let mut candidates = response.items;
        candidates.truncate(self.config.max_users.get());
        debug!("User search for '{}' kept {} candidates", query, candidates.len());
        Ok(candidates)
    }

    /// List the most recently updated repositories of `handle`.
    pub async fn fetch_projects(&self, handle: &str) -> Result<Vec<ProjectSummary>, AggregateError> {
        let max_repos = self.config.max_repos.get();
        let mut url = self.repos_url(handle);
        url.query_pairs_mut()
            .append_pair("sort", "updated")
            .append_pair("per_page", &max_repos.to_string());

        let repos: Vec<RawRepository> = self.get_json(url).await.map_err(|e| {
            warn!("Listing repositories for '{}' failed: {}", handle, error_chain(&e));
            AggregateError::detail(handle, e)
        })?;

        // The upstream may ignore `per_page`.
        Ok(repos
            .into_iter()
            .take(max_repos)
            .map(ProjectSummary::from)
            .collect())
    }

    fn repos_url(&self, handle: &str) -> Url {
        let mut url = self.config.users_url.clone();
        // `with_api_base` rejects URLs that cannot take path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(handle).push("repos");
        }
        url
    }

    /// Issue one GET and decode a successful JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, UpstreamFailure> {
        debug!("Requesting URL: {}", url);
        let response = self
            .client
            .get(url)
            .header("Accept", GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .send()
            .await?;

        log_rate_limit(response.headers());

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamFailure::Status(status));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Report the rate-limit headers. Never waits.
fn log_rate_limit(headers: &HeaderMap) {
    let (Some(remaining), Some(limit)) = (
        header_u64(headers, "X-RateLimit-Remaining"),
        header_u64(headers, "X-RateLimit-Limit"),
    ) else {
        return;
    };

    debug!("Rate limit: {}/{}", remaining, limit);
    if remaining > 0 {
        return;
    }

    match header_u64(headers, "X-RateLimit-Reset")
        .and_then(|ts| i64::try_from(ts).ok())
        .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
    {
        Some(reset) => warn!("Rate limit exhausted, resets at {}", reset.to_rfc3339()),
        None => warn!("Rate limit exhausted"),
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.parse().ok()
}
