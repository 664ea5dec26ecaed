//! Configuration file support for portfolio.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Legacy unprefixed environment variables (`SUPABASE_DATABASE_URL` or
//!    `DATABASE_URL`, `GITHUB_TOKEN`, `GITHUB_USERNAME`)
//! 3. Environment variables prefixed with `PORTFOLIO_`, e.g. `PORTFOLIO_DATABASE_URL`
//! 4. Config file (./portfolio.toml, then ~/.config/portfolio/config.toml)
//! 5. Built-in defaults
//!
//! A `.env` file in the working directory is loaded into the environment first.
//!
//! Example config file:
//! ```toml
//! [database]
//! url = "postgres://localhost/portfolio"
//!
//! [github]
//! token = "ghp_..."  # or GITHUB_TOKEN / PORTFOLIO_GITHUB_TOKEN
//! username = "octocat"
//! api = "https://api.github.com"
//!
//! [sync]
//! policy = "upsert"  # or "insert-only"
//!
//! [server]
//! addr = "127.0.0.1:3000"
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use config::builder::DefaultState;
use config::{Config as ConfigBuilder, ConfigBuilder as Builder, Environment, File, FileFormat};
use directories::ProjectDirs;
use portfolio::github::{DEFAULT_API_BASE, GitHubOptions};
use portfolio::sync::ReconcilePolicy;
use serde::Deserialize;
use thiserror::Error;

/// Default listen address for `portfolio serve`.
pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:3000";

/// Legacy variables consulted for the database URL, in order.
const LEGACY_DATABASE_VARS: [&str; 2] = ["SUPABASE_DATABASE_URL", "DATABASE_URL"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing {setting}: set {hint}")]
    Missing {
        setting: &'static str,
        hint: &'static str,
    },

    #[error("Invalid {setting}: {message}")]
    Invalid {
        setting: &'static str,
        message: String,
    },
}

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub github: GitHubConfig,
    pub sync: SyncConfig,
    pub server: ServerConfig,
}

/// Database configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL (`postgres://...` or `sqlite://...`). No default.
    pub url: Option<String>,
}

/// GitHub configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Personal access token. Optional for sync, required for backfill.
    pub token: Option<String>,
    /// Account whose public repositories are synced.
    pub username: Option<String>,
    /// REST API root.
    pub api: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            username: None,
            api: DEFAULT_API_BASE.to_string(),
        }
    }
}

/// Sync defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// `upsert` or `insert-only`.
    pub policy: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            policy: ReconcilePolicy::default().to_string(),
        }
    }
}

/// API server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_SERVER_ADDR.to_string(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

impl Config {
    /// Load configuration from files and the process environment.
    ///
    /// A broken config file is reported and replaced by defaults so that
    /// commands needing no settings (completions) still work.
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(xdg_config) = Self::default_config_path()
            && xdg_config.exists()
        {
            tracing::debug!("Loading config from {:?}", xdg_config);
            builder = builder.add_source(
                File::from(xdg_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let local_config = PathBuf::from("portfolio.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./portfolio.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // e.g. PORTFOLIO_DATABASE_URL -> database.url
        builder = builder.add_source(
            Environment::with_prefix("PORTFOLIO")
                .separator("_")
                .try_parsing(false),
        );

        let mut config = Self::from_builder(builder);
        config.apply_legacy_env(|name| std::env::var(name).ok());
        config
    }

    fn from_builder(builder: Builder<DefaultState>) -> Self {
        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Overlay the unprefixed variables the deployment scripts already export.
    fn apply_legacy_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = LEGACY_DATABASE_VARS
            .iter()
            .find_map(|name| non_blank(lookup(name).as_deref()))
        {
            self.database.url = Some(url);
        }
        if let Some(token) = non_blank(lookup("GITHUB_TOKEN").as_deref()) {
            self.github.token = Some(token);
        }
        if let Some(username) = non_blank(lookup("GITHUB_USERNAME").as_deref()) {
            self.github.username = Some(username);
        }
    }

    /// The database URL, or a configuration error naming how to set it.
    pub fn database_url(&self) -> Result<String, ConfigError> {
        non_blank(self.database.url.as_deref()).ok_or(ConfigError::Missing {
            setting: "database URL",
            hint: "SUPABASE_DATABASE_URL, DATABASE_URL or [database] url",
        })
    }

    /// The username to sync: the CLI argument if given, else config/env.
    pub fn github_username(&self, cli: Option<&str>) -> Result<String, ConfigError> {
        non_blank(cli)
            .or_else(|| non_blank(self.github.username.as_deref()))
            .ok_or(ConfigError::Missing {
                setting: "GitHub username",
                hint: "GITHUB_USERNAME, [github] username or pass <username>",
            })
    }

    pub fn github_token(&self) -> Option<String> {
        non_blank(self.github.token.as_deref())
    }

    pub fn require_github_token(&self) -> Result<String, ConfigError> {
        self.github_token().ok_or(ConfigError::Missing {
            setting: "GitHub token",
            hint: "GITHUB_TOKEN or [github] token",
        })
    }

    pub fn github_options(&self) -> GitHubOptions {
        GitHubOptions {
            api_base: self.github.api.clone(),
            ..GitHubOptions::default()
        }
        .with_token(self.github_token())
    }

    pub fn sync_policy(&self) -> Result<ReconcilePolicy, ConfigError> {
        self.sync
            .policy
            .parse()
            .map_err(|message| ConfigError::Invalid {
                setting: "sync.policy",
                message,
            })
    }

    /// Listen address, preferring the CLI flag.
    pub fn server_addr(&self, cli: Option<&str>) -> Result<SocketAddr, ConfigError> {
        let raw = non_blank(cli).unwrap_or_else(|| self.server.addr.trim().to_string());
        raw.parse().map_err(|e| ConfigError::Invalid {
            setting: "server address",
            message: format!("{raw}: {e}"),
        })
    }

    /// Get the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "portfolio").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
