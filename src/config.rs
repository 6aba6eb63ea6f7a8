//! Configuration management for Spindex
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::cli::Cli;
use crate::error::{Result, SpindexError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Spindex
///
/// Holds the Spotify application settings and the behavior of the
/// interactive login flow. Every field has a default, so the CLI works
/// without a config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Spotify application and endpoint settings
    #[serde(default)]
    pub spotify: SpotifyConfig,

    /// Login flow behavior
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spotify: SpotifyConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

/// Spotify application configuration
///
/// The defaults point at the public Spotify accounts service and the
/// Web API. Overriding the URLs is only useful for tests and local mocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyConfig {
    /// OAuth client identifier of the registered Spotify application.
    ///
    /// This is a public (PKCE) client id; there is no client secret.
    #[serde(default = "default_client_id")]
    pub client_id: String,

    /// Authorization endpoint presented to the user's browser
    #[serde(default = "default_authorize_url")]
    pub authorize_url: String,

    /// Token endpoint for code exchange and refresh
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Base URL of the Spotify Web API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// OAuth scopes requested during login
    ///
    /// The defaults cover private/collaborative playlists and the user's
    /// saved tracks.
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

fn default_client_id() -> String {
    "e2d7b802ac6a4132a265fab71f0645d0".to_string()
}

fn default_authorize_url() -> String {
    "https://accounts.spotify.com/authorize".to_string()
}

fn default_token_url() -> String {
    "https://accounts.spotify.com/api/token".to_string()
}

fn default_api_base() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_scopes() -> Vec<String> {
    vec![
        "playlist-read-private".to_string(),
        "playlist-read-collaborative".to_string(),
        "user-library-read".to_string(),
    ]
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: default_client_id(),
            authorize_url: default_authorize_url(),
            token_url: default_token_url(),
            api_base: default_api_base(),
            scopes: default_scopes(),
        }
    }
}

/// Login flow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Local TCP port the callback listener binds on the loopback
    /// interface.
    ///
    /// Must match the redirect URI registered for the Spotify
    /// application. `0` asks the OS for a free port; only useful when the
    /// application registration allows a wildcard loopback redirect.
    #[serde(default = "default_redirect_port")]
    pub redirect_port: u16,

    /// How long `login` waits for the browser callback before giving up
    /// (seconds)
    #[serde(default = "default_login_timeout")]
    pub login_timeout_seconds: u64,
}

fn default_redirect_port() -> u16 {
    1069
}

fn default_login_timeout() -> u64 {
    300
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            redirect_port: default_redirect_port(),
            login_timeout_seconds: default_login_timeout(),
        }
    }
}

impl Config {
    /// Loads configuration from a YAML file and applies CLI overrides.
    ///
    /// A missing file is not an error: the built-in defaults are used so
    /// that `spindex login` works out of the box.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file.
    /// * `cli` - Parsed command line; `--client-id` overrides the file.
    ///
    /// # Errors
    ///
    /// Returns [`SpindexError::Io`] if the file exists but cannot be read,
    /// or [`SpindexError::Yaml`] if it cannot be parsed.
    pub fn load(path: &str, cli: &Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            let contents = std::fs::read_to_string(path).map_err(SpindexError::Io)?;
            serde_yaml::from_str(&contents).map_err(SpindexError::Yaml)?
        } else {
            tracing::debug!("Config file {path} not found, using defaults");
            Config::default()
        };

        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(client_id) = &cli.client_id {
            self.spotify.client_id = client_id.clone();
        }
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SpindexError::Config`] when a field is empty or an
    /// endpoint URL does not parse.
    pub fn validate(&self) -> Result<()> {
        if self.spotify.client_id.trim().is_empty() {
            return Err(SpindexError::Config("spotify.client_id must not be empty".to_string()).into());
        }
        if self.spotify.scopes.is_empty() {
            return Err(SpindexError::Config("spotify.scopes must not be empty".to_string()).into());
        }
        for (name, value) in [
            ("spotify.authorize_url", &self.spotify.authorize_url),
            ("spotify.token_url", &self.spotify.token_url),
            ("spotify.api_base", &self.spotify.api_base),
        ] {
            url::Url::parse(value)
                .map_err(|e| SpindexError::Config(format!("{name} is not a valid URL: {e}")))?;
        }
        if self.auth.login_timeout_seconds == 0 {
            return Err(
                SpindexError::Config("auth.login_timeout_seconds must be positive".to_string())
                    .into(),
            );
        }
        Ok(())
    }
}
