//! Data models for the activity dashboard.
//!
//! This module contains the records decoded from the GitHub REST API
//! and the derived statistics computed from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fallback shown when a profile has no biography.
pub const NO_BIO: &str = "No bio available";

/// Label shown for repositories without a detected language.
pub const PLAIN_TEXT: &str = "Plain Text";

/// A GitHub user profile from the `/users/{username}` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Account handle.
    pub login: String,
    /// Display name, if the user set one.
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar image URL.
    pub avatar_url: String,
    /// Profile page URL.
    pub html_url: String,
    /// Biography text.
    #[serde(default)]
    pub bio: Option<String>,
    /// Number of public repositories.
    pub public_repos: u32,
    /// Number of followers.
    pub followers: u32,
    /// Number of accounts this user follows.
    #[serde(default)]
    pub following: u32,
}

impl Profile {
    /// Returns the display name, falling back to the login.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.login,
        }
    }

    /// Returns the biography or a placeholder.
    pub fn bio_or_default(&self) -> &str {
        match self.bio.as_deref() {
            Some(bio) if !bio.trim().is_empty() => bio,
            _ => NO_BIO,
        }
    }
}

/// A repository from the `/users/{username}/repos` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Stable identifier, used as the list key.
    pub id: u64,
    /// Repository name.
    pub name: String,
    /// Repository page URL.
    pub html_url: String,
    /// Star count.
    pub stargazers_count: u64,
    /// Fork count.
    pub forks_count: u64,
    /// Primary language, as detected by GitHub.
    #[serde(default)]
    pub language: Option<String>,
    /// Short description.
    #[serde(default)]
    pub description: Option<String>,
}

impl Repository {
    /// Returns the language label, treating an empty label as absent.
    pub fn language_label(&self) -> Option<&str> {
        self.language.as_deref().filter(|lang| !lang.is_empty())
    }

    /// Returns the language label or "Plain Text".
    pub fn language_or_plain(&self) -> &str {
        self.language_label().unwrap_or(PLAIN_TEXT)
    }
}

/// Number of repositories using one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageCount {
    pub language: String,
    pub count: usize,
}

/// Statistics derived from a repository listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationResult {
    /// Sum of star counts over every repository.
    pub total_stars: u64,
    /// At most five languages, most used first.
    pub top_languages: Vec<LanguageCount>,
    /// At most five repositories, most starred first.
    pub top_repositories: Vec<Repository>,
    /// Number of repositories carrying any language label.
    pub labeled_repositories: usize,
}

impl AggregationResult {
    /// Share of labeled repositories using this language, in percent.
    ///
    /// The denominator is every labeled repository in the listing, not only
    /// the ones behind the top languages.
    pub fn language_share(&self, language: &LanguageCount) -> f64 {
        if self.labeled_repositories == 0 {
            return 0.0;
        }
        language.count as f64 / self.labeled_repositories as f64 * 100.0
    }
}

/// Raw records returned for one identity.
#[derive(Debug, Clone)]
pub struct IdentityData {
    pub profile: Profile,
    pub repositories: Vec<Repository>,
}

/// Everything the presentation layer needs for one successful query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    /// The queried profile.
    pub profile: Profile,
    /// Aggregated repository statistics.
    pub stats: AggregationResult,
    /// When the query completed.
    pub generated_at: DateTime<Utc>,
}
