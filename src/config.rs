//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.ghstats.toml` files.

use crate::cli::{Args, OutputFormat};
use crate::github::{DEFAULT_BASE_URL, DEFAULT_PER_PAGE, DEFAULT_TIMEOUT_MS};
use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name.
pub const CONFIG_FILE: &str = ".ghstats.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Persisted state settings.
    #[serde(default)]
    pub state: StateConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// GitHub API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Users endpoint root.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bounded wait per request, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Repository page size. Only one page is ever fetched.
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Personal access token, raises the rate limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            per_page: default_per_page(),
            token: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

/// Where the last searched username is kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateConfig {
    /// State directory. Defaults to `$HOME/.ghstats`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Report settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Check that settings are within what the API accepts.
    ///
    /// The listing page size is capped at 100 by GitHub, and a zero timeout
    /// would fail every request before it is sent.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=DEFAULT_PER_PAGE).contains(&self.api.per_page),
            "api.per_page must be between 1 and {}, got {}",
            DEFAULT_PER_PAGE,
            self.api.per_page
        );
        ensure!(self.api.timeout_ms > 0, "api.timeout_ms must be greater than 0");
        Ok(())
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when given explicitly.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref base_url) = args.base_url {
            self.api.base_url = base_url.clone();
        }
        if let Some(timeout_ms) = args.timeout_ms {
            self.api.timeout_ms = timeout_ms;
        }
        if args.token.is_some() {
            self.api.token = args.token.clone();
        }
        if let Some(ref dir) = args.state_dir {
            self.state.dir = Some(dir.clone());
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
