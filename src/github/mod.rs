//! GitHub API access.
//!
//! This module fetches a user's profile and repository listing with a
//! bounded wait per request and classifies failures.

pub mod client;
pub mod error;

pub use client::{ClientConfig, GitHubClient, DEFAULT_BASE_URL, DEFAULT_PER_PAGE, DEFAULT_TIMEOUT_MS};
pub use error::FetchError;
