//! Query flow and view state.
//!
//! A [`Session`] owns the client and the key-value store, remembers the last
//! submitted username and moves through Idle → Loading → Success | Error.

use crate::analysis::aggregate;
use crate::github::{FetchError, GitHubClient};
use crate::models::Dashboard;
use crate::state::{KeyValueStore, LAST_IDENTITY_KEY};
use chrono::Utc;
use std::fmt;
use tracing::{debug, info, warn};

/// What the front end should show.
#[derive(Debug)]
pub enum ViewState {
    /// Nothing submitted yet.
    Idle,
    /// A query is in flight.
    Loading { identity: String },
    /// The last query succeeded.
    Success(Box<Dashboard>),
    /// The last query failed; no dashboard is shown.
    Error(FetchError),
}

impl ViewState {
    pub fn dashboard(&self) -> Option<&Dashboard> {
        match self {
            ViewState::Success(dashboard) => Some(dashboard),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            ViewState::Error(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewState::Idle => write!(f, "idle"),
            ViewState::Loading { identity } => write!(f, "loading {}", identity),
            ViewState::Success(dashboard) => write!(f, "showing {}", dashboard.profile.login),
            ViewState::Error(err) => write!(f, "error: {}", err),
        }
    }
}

/// Fetch and aggregate one user's data.
pub async fn query(client: &GitHubClient, identity: &str) -> Result<Dashboard, FetchError> {
    let data = client.fetch_identity_data(identity).await?;
    let stats = aggregate(&data.repositories);

    debug!(
        "{}: {} stars, {} languages ranked",
        data.profile.login,
        stats.total_stars,
        stats.top_languages.len()
    );

    Ok(Dashboard {
        profile: data.profile,
        stats,
        generated_at: Utc::now(),
    })
}

/// One dashboard session.
pub struct Session<S: KeyValueStore> {
    client: GitHubClient,
    store: S,
    state: ViewState,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(client: GitHubClient, store: S) -> Self {
        Self {
            client,
            store,
            state: ViewState::Idle,
        }
    }

    /// The username saved by a previous submission, if any.
    pub fn saved_identity(&self) -> Option<String> {
        match self.store.get(LAST_IDENTITY_KEY) {
            Ok(value) => value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            Err(e) => {
                warn!("Failed to read saved username: {}", e);
                None
            }
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Enter `Loading` for a username and save it.
    ///
    /// Returns false, leaving the state untouched, for blank input. A failure
    /// to save is logged and does not stop the query.
    pub fn begin(&mut self, input: &str) -> bool {
        let identity = input.trim();
        if identity.is_empty() {
            debug!("Ignoring blank submission");
            return false;
        }

        self.state = ViewState::Loading {
            identity: identity.to_string(),
        };

        if let Err(e) = self.store.set(LAST_IDENTITY_KEY, identity) {
            warn!("Failed to save username {}: {}", identity, e);
        }

        true
    }

    /// Run the query for the username in `Loading`.
    ///
    /// Any other state is returned as is.
    pub async fn complete(&mut self) -> &ViewState {
        let identity = match &self.state {
            ViewState::Loading { identity } => identity.clone(),
            _ => return &self.state,
        };

        self.state = match query(&self.client, &identity).await {
            Ok(dashboard) => {
                info!("Dashboard ready for {}", dashboard.profile.login);
                ViewState::Success(Box::new(dashboard))
            }
            Err(e) => {
                warn!("Query for {} failed: {}", identity, e);
                ViewState::Error(e)
            }
        };

        &self.state
    }
}
