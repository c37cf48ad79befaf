use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::InvalidQueryError;

/// A validated, non-empty search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Accepts any text that is not blank. The text is kept verbatim.
    pub fn parse(raw: &str) -> Result<Self, InvalidQueryError> {
        if raw.trim().is_empty() {
            return Err(InvalidQueryError);
        }
        Ok(Query(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `GET /search/users`.
#[derive(Debug, Deserialize)]
pub(crate) struct UserSearchResponse {
    pub items: Vec<Candidate>,
}

/// A user returned by the search, before enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Candidate {
    pub login: String,
}

/// One element of `GET /users/{login}/repos`. Everything else is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRepository {
    pub name: String,
    pub html_url: String,
}

/// Name and canonical URL of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub name: String,
    pub url: String,
}

impl From<RawRepository> for ProjectSummary {
    fn from(repo: RawRepository) -> Self {
        ProjectSummary {
            name: repo.name,
            url: repo.html_url,
        }
    }
}

/// A search hit together with its most recently updated repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedUser {
    pub username: String,
    pub repos: Vec<ProjectSummary>,
}

/// Enriched users in the order the search ranked them.
pub type AggregationResult = Vec<EnrichedUser>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_queries_are_rejected() {
        assert_eq!(Query::parse(""), Err(InvalidQueryError));
        assert_eq!(Query::parse("  \t"), Err(InvalidQueryError));
    }

    #[test]
    fn query_text_is_kept_verbatim() {
        let query = Query::parse(" tom location:berlin ").unwrap();
        assert_eq!(query.as_str(), " tom location:berlin ");
    }

    #[test]
    fn raw_repository_maps_to_name_and_url_only() {
        let raw: RawRepository = serde_json::from_value(json!({
            "id": 1296269,
            "name": "Hello-World",
            "full_name": "octocat/Hello-World",
            "html_url": "https://github.com/octocat/Hello-World",
            "stargazers_count": 80
        }))
        .unwrap();

        let summary = ProjectSummary::from(raw);
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({ "name": "Hello-World", "url": "https://github.com/octocat/Hello-World" })
        );
    }

    #[test]
    fn search_response_without_items_is_malformed() {
        let parsed = serde_json::from_value::<UserSearchResponse>(json!({ "total_count": 0 }));
        assert!(parsed.is_err());
    }
}
