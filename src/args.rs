use std::num::{NonZeroU64, NonZeroUsize};

use clap::Parser;
use url::Url;

use crate::config::{DEFAULT_API_BASE, DEFAULT_MAX_REPOS, DEFAULT_MAX_USERS, DEFAULT_TIMEOUT_SECS};

/// Search GitHub users and list the most recently updated repositories of
/// the top matches.
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about,
    long_about = "Searches GitHub users for a query, then fetches the most recently updated repositories of every top match concurrently and prints the combined result as JSON."
)]
pub struct Args {
    /// User search query, e.g. "octocat" or "tom location:berlin".
    pub query: String,

    /// Write the JSON result to this file instead of stdout.
    #[clap(short, long)]
    pub output: Option<String>,

    /// Maximum number of users to enrich.
    #[clap(short = 'u', long, value_name = "NUM", default_value_t = DEFAULT_MAX_USERS)]
    pub max_users: NonZeroUsize,

    /// Maximum number of repositories listed per user.
    #[clap(short = 'r', long, value_name = "NUM", default_value_t = DEFAULT_MAX_REPOS)]
    pub max_repos: NonZeroUsize,

    /// GitHub API root, useful for GitHub Enterprise or a local mock.
    #[clap(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_BASE)]
    pub api_url: Url,

    /// Timeout in seconds for each upstream request.
    #[clap(short, long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: NonZeroU64,

    /// Emit logs as newline-delimited JSON.
    #[clap(long)]
    pub json_logs: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_config() {
        let args = Args::try_parse_from(["github-user-repos", "octocat"]).unwrap();
        assert_eq!(args.max_users, DEFAULT_MAX_USERS);
        assert_eq!(args.max_repos, DEFAULT_MAX_REPOS);
        assert_eq!(args.timeout, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let parsed = Args::try_parse_from(["github-user-repos", "octocat", "--timeout", "0"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn zero_limits_are_rejected() {
        assert!(Args::try_parse_from(["github-user-repos", "octocat", "-u", "0"]).is_err());
        assert!(Args::try_parse_from(["github-user-repos", "octocat", "-r", "0"]).is_err());
    }
}
