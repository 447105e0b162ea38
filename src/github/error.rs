//! Error types for GitHub API queries.

use reqwest::StatusCode;
use thiserror::Error;

/// Why a profile query produced no dashboard.
///
/// Every variant renders to the single message shown to the user.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The username was empty after trimming.
    #[error("Username must not be empty")]
    InvalidIdentity,

    /// The profile endpoint answered 404.
    #[error("User not found")]
    NotFound,

    /// Either endpoint answered with a non-success status.
    #[error("API request failed")]
    RequestFailed { status: StatusCode },

    /// No response arrived within the bounded wait.
    #[error("Request timed out")]
    TimedOut,

    /// The request could not be sent or the connection failed.
    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    /// A response body was not the expected JSON record.
    #[error("Failed to decode {resource}: {source}")]
    Decode {
        resource: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The configured API token is not a valid header value.
    #[error("Invalid API token")]
    InvalidToken,

    /// The HTTP client could not be constructed.
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl FetchError {
    /// HTTP status behind the failure, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::NotFound => Some(StatusCode::NOT_FOUND),
            FetchError::RequestFailed { status } => Some(*status),
            _ => None,
        }
    }
}
