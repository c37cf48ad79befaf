//! # GitHub User Repos
//!
//! A Rust library for searching GitHub users and listing the most recently
//! updated repositories of the top matches, fetched concurrently.
//!
//! ## Main Components
//!
//! - [`GitHubAggregator`]: Runs the user search and the per-user repository listings
//! - [`AggregatorConfig`]: Upstream endpoints, result limits and request timeout
//! - [`Query`]: A validated, non-empty search query
//! - [`Args`]: Command line argument structure for the bundled binary
//!
//! ## Example
//!
//! ```no_run
//! use github_user_repos_lib::{AggregatorConfig, GitHubAggregator, Query};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let aggregator = GitHubAggregator::new(AggregatorConfig::default())?;
//!
//!     let query = Query::parse("octocat")?;
//!     let users = aggregator.aggregate(&query).await?;
//!
//!     println!("{}", serde_json::to_string_pretty(&users)?);
//!     Ok(())
//! }
//! ```

mod args;
mod config;
mod error;
mod github_aggregator;
mod models;

// Re-export main components for documentation and external use
pub use crate::args::Args;
pub use crate::config::{
    AggregatorConfig, DEFAULT_API_BASE, DEFAULT_MAX_REPOS, DEFAULT_MAX_USERS, DEFAULT_TIMEOUT,
    DEFAULT_TIMEOUT_SECS,
};
pub use crate::error::{
    error_chain, AggregateError, InvalidQueryError, UpstreamFailure, FALLBACK_STATUS,
};
pub use crate::github_aggregator::GitHubAggregator;
pub use crate::models::{AggregationResult, Candidate, EnrichedUser, ProjectSummary, Query};
