//! GitHub REST client with bounded waits.
//!
//! - `fetch_bounded`: one GET with a hard timeout, no retry
//! - `fetch_identity_data`: profile + repository listing, fetched concurrently

use crate::github::error::FetchError;
use crate::models::{IdentityData, Profile, Repository};
use futures::future::try_join;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Root of the GitHub users API.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com/users";

/// Default bounded wait per request.
pub const DEFAULT_TIMEOUT_MS: u64 = 8000;

/// Repositories requested per listing. Only the first page is fetched.
pub const DEFAULT_PER_PAGE: u32 = 100;

const USER_AGENT: &str = concat!("ghstats/", env!("CARGO_PKG_VERSION"));

/// Configuration for the client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL; requests go to `{base_url}/{username}`.
    pub base_url: String,
    /// Bounded wait per request.
    pub timeout: Duration,
    /// Page size of the repository listing.
    pub per_page: u32,
    /// Optional bearer token.
    pub token: Option<String>,
    /// Honor proxy settings from the environment.
    pub use_system_proxy: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            per_page: DEFAULT_PER_PAGE,
            token: None,
            use_system_proxy: true,
        }
    }
}

impl From<&crate::config::ApiConfig> for ClientConfig {
    fn from(config: &crate::config::ApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
            per_page: config.per_page,
            token: config.token.clone(),
            use_system_proxy: true,
        }
    }
}

/// Client for the GitHub users API.
pub struct GitHubClient {
    config: ClientConfig,
    http: Client,
}

impl GitHubClient {
    /// Create a new client.
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        if let Some(ref token) = config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| FetchError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers);
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build().map_err(FetchError::ClientBuild)?;

        Ok(Self {
            config: ClientConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                ..config
            },
            http,
        })
    }

    /// The effective configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// URL of the profile resource.
    pub fn profile_url(&self, identity: &str) -> String {
        format!("{}/{}", self.config.base_url, identity)
    }

    /// URL of the first page of the repository listing.
    pub fn repos_url(&self, identity: &str) -> String {
        format!(
            "{}/{}/repos?per_page={}",
            self.config.base_url, identity, self.config.per_page
        )
    }

    /// Issue a GET and wait at most `timeout` for the response.
    ///
    /// On expiry the in-flight request is dropped. The body is not covered
    /// by the bound.
    pub async fn fetch_bounded(&self, url: &str, timeout: Duration) -> Result<Response, FetchError> {
        debug!("GET {} (timeout {}ms)", url, timeout.as_millis());

        match tokio::time::timeout(timeout, self.http.get(url).send()).await {
            Ok(Ok(response)) => {
                debug!("GET {} -> {}", url, response.status());
                Ok(response)
            }
            Ok(Err(e)) if e.is_timeout() => {
                warn!("GET {} timed out in transport", url);
                Err(FetchError::TimedOut)
            }
            Ok(Err(e)) => {
                warn!("GET {} failed: {}", url, e);
                Err(FetchError::Transport(e))
            }
            Err(_) => {
                warn!("GET {} timed out after {}ms", url, timeout.as_millis());
                Err(FetchError::TimedOut)
            }
        }
    }

    /// Fetch a user's profile and first page of repositories.
    pub async fn fetch_identity_data(&self, handle: &str) -> Result<IdentityData, FetchError> {
        let identity = handle.trim();
        if identity.is_empty() {
            return Err(FetchError::InvalidIdentity);
        }

        info!("Fetching profile and repositories for {}", identity);

        let profile_url = self.profile_url(identity);
        let repos_url = self.repos_url(identity);

        let (profile_resp, repos_resp) = try_join(
            self.fetch_bounded(&profile_url, self.config.timeout),
            self.fetch_bounded(&repos_url, self.config.timeout),
        )
        .await?;

        classify_status(profile_resp.status(), repos_resp.status())?;

        let profile: Profile = profile_resp
            .json()
            .await
            .map_err(|source| FetchError::Decode {
                resource: "profile",
                source,
            })?;

        let repositories: Vec<Repository> =
            repos_resp
                .json()
                .await
                .map_err(|source| FetchError::Decode {
                    resource: "repositories",
                    source,
                })?;

        if repositories.len() >= self.config.per_page as usize {
            warn!(
                "{} returned a full page of {} repositories; later pages are not fetched",
                identity,
                repositories.len()
            );
        }

        info!(
            "Fetched {} ({} repositories)",
            profile.login,
            repositories.len()
        );

        Ok(IdentityData {
            profile,
            repositories,
        })
    }
}

/// Map the two response statuses to a failure, profile 404 first.
fn classify_status(profile: StatusCode, repos: StatusCode) -> Result<(), FetchError> {
    if profile == StatusCode::NOT_FOUND {
        return Err(FetchError::NotFound);
    }
    if !profile.is_success() {
        return Err(FetchError::RequestFailed { status: profile });
    }
    if !repos.is_success() {
        return Err(FetchError::RequestFailed { status: repos });
    }
    Ok(())
}
