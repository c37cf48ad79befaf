use std::error::Error as StdError;

use reqwest::StatusCode;
use thiserror::Error;

/// Status reported for failures where the upstream never answered.
pub const FALLBACK_STATUS: u16 = 500;

/// Why a single upstream call failed.
#[derive(Debug, Error)]
pub enum UpstreamFailure {
    #[error("request failed")]
    Transport(#[from] reqwest::Error),

    #[error("upstream responded with {0}")]
    Status(StatusCode),

    #[error("malformed response body")]
    Body(#[from] serde_json::Error),
}

impl UpstreamFailure {
    /// The upstream HTTP status, when one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            UpstreamFailure::Transport(e) => e.status(),
            UpstreamFailure::Status(status) => Some(*status),
            UpstreamFailure::Body(_) => None,
        }
    }
}

/// Terminal failure of an aggregation call.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// The user search call failed; no repository calls were made.
    #[error("user search failed")]
    UpstreamLookup {
        status: Option<StatusCode>,
        #[source]
        source: UpstreamFailure,
    },

    /// Listing repositories for one candidate failed.
    #[error("fetching repositories for '{handle}' failed")]
    UpstreamDetail {
        handle: String,
        status: Option<StatusCode>,
        #[source]
        source: UpstreamFailure,
    },
}

impl AggregateError {
    pub(crate) fn lookup(source: UpstreamFailure) -> Self {
        AggregateError::UpstreamLookup {
            status: source.status(),
            source,
        }
    }

    pub(crate) fn detail(handle: &str, source: UpstreamFailure) -> Self {
        AggregateError::UpstreamDetail {
            handle: handle.to_string(),
            status: source.status(),
            source,
        }
    }

    /// Upstream status, if the failing call got one.
    pub fn upstream_status(&self) -> Option<StatusCode> {
        match self {
            AggregateError::UpstreamLookup { status, .. }
            | AggregateError::UpstreamDetail { status, .. } => *status,
        }
    }

    /// Status code the boundary should report for this failure.
    pub fn status_code(&self) -> u16 {
        self.upstream_status()
            .map(|s| s.as_u16())
            .unwrap_or(FALLBACK_STATUS)
    }
}

/// Join an error and all of its sources into one line, outermost first.
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    std::iter::successors(Some(err), |e| (*e).source())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

/// The caller supplied a missing or blank query.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("query parameter 'q' is required and must not be empty")]
pub struct InvalidQueryError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_prefers_upstream_status() {
        let err = AggregateError::lookup(UpstreamFailure::Status(StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(err.upstream_status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(err.status_code(), 503);
    }

    #[test]
    fn status_code_falls_back_without_upstream_status() {
        let body_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = AggregateError::detail("octocat", UpstreamFailure::Body(body_err));
        assert_eq!(err.upstream_status(), None);
        assert_eq!(err.status_code(), FALLBACK_STATUS);
    }

    #[test]
    fn detail_chain_names_handle_and_status_once() {
        let err = AggregateError::detail("octocat", UpstreamFailure::Status(StatusCode::NOT_FOUND));
        assert_eq!(
            error_chain(&err),
            "fetching repositories for 'octocat' failed: upstream responded with 404 Not Found"
        );
    }

    #[test]
    fn body_cause_appears_once_in_chain() {
        let body_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let cause = body_err.to_string();
        let err = AggregateError::lookup(UpstreamFailure::Body(body_err));

        let chain = error_chain(&err);
        assert_eq!(chain, format!("user search failed: malformed response body: {cause}"));
        assert_eq!(chain.matches(cause.as_str()).count(), 1);
        assert!(!err.to_string().contains(cause.as_str()));
    }
}
