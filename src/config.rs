use std::num::{NonZeroU64, NonZeroUsize};
use std::time::Duration;

use reqwest::Client;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_MAX_USERS: NonZeroUsize = non_zero_usize(5);
pub const DEFAULT_MAX_REPOS: NonZeroUsize = non_zero_usize(5);
pub const DEFAULT_TIMEOUT_SECS: NonZeroU64 = match NonZeroU64::new(10) {
    Some(secs) => secs,
    None => panic!("timeout must be positive"),
};
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS.get());

/// Endpoints and limits used by [`GitHubAggregator`](crate::GitHubAggregator).
///
/// Only [`AggregatorConfig::with_api_base`] builds one, so both endpoints are
/// always URLs that accept extra path segments.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// User search endpoint, queried with `?q=`.
    pub(crate) search_url: Url,
    /// Base for `/{login}/repos`.
    pub(crate) users_url: Url,
    pub(crate) max_users: NonZeroUsize,
    pub(crate) max_repos: NonZeroUsize,
    pub(crate) request_timeout: Duration,
    pub(crate) user_agent: String,
}

impl AggregatorConfig {
    /// Derives both endpoints from an API root such as `https://api.github.com`.
    pub fn with_api_base(api_base: &Url) -> Result<Self, url::ParseError> {
        let mut base = api_base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(AggregatorConfig {
            search_url: base.join("search/users")?,
            users_url: base.join("users")?,
            max_users: DEFAULT_MAX_USERS,
            max_repos: DEFAULT_MAX_REPOS,
            request_timeout: DEFAULT_TIMEOUT,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        })
    }

    pub fn max_users(mut self, max_users: NonZeroUsize) -> Self {
        self.max_users = max_users;
        self
    }

    pub fn max_repos(mut self, max_repos: NonZeroUsize) -> Self {
        self.max_repos = max_repos;
        self
    }

    /// Timeout for each upstream request. Zero disables it.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build the HTTP client shared by every upstream call.
    pub(crate) fn build_client(&self) -> Result<Client, reqwest::Error> {
        let mut builder = Client::builder().user_agent(&self.user_agent);
        if !self.request_timeout.is_zero() {
            builder = builder.timeout(self.request_timeout);
        }
        builder.build()
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Url::parse(DEFAULT_API_BASE)
            .and_then(|base| AggregatorConfig::with_api_base(&base))
            .expect("default API base is a valid URL")
    }
}

const fn non_zero_usize(n: usize) -> NonZeroUsize {
    match NonZeroUsize::new(n) {
        Some(n) => n,
        None => panic!("limit must be positive"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_github() {
        let config = AggregatorConfig::default();
        assert_eq!(config.search_url.as_str(), "https://api.github.com/search/users");
        assert_eq!(config.users_url.as_str(), "https://api.github.com/users");
        assert_eq!(config.max_users.get(), 5);
        assert_eq!(config.max_repos.get(), 5);
    }

    #[test]
    fn api_base_keeps_path_prefix() {
        let base = Url::parse("http://127.0.0.1:8080/api/v3").unwrap();
        let config = AggregatorConfig::with_api_base(&base).unwrap();
        assert_eq!(config.search_url.as_str(), "http://127.0.0.1:8080/api/v3/search/users");
        assert_eq!(config.users_url.as_str(), "http://127.0.0.1:8080/api/v3/users");
    }

    #[test]
    fn api_base_must_accept_path_segments() {
        let base = Url::parse("mailto:octocat@github.com").unwrap();
        assert!(AggregatorConfig::with_api_base(&base).is_err());
    }
}
