//! CLI command handlers
//!
//! One module per subcommand. Each handler wires an
//! [`Authenticator`](crate::auth::session::Authenticator) and a
//! [`SpotifyClient`](crate::spotify::client::SpotifyClient) from the loaded
//! configuration; the login flow runs lazily on the first API call.

pub mod liked;
pub mod login;
pub mod playlists;
pub mod tracks;
pub mod whoami;

use std::sync::Arc;

use crate::auth::session::{AuthParams, Authenticator};
use crate::config::Config;
use crate::spotify::client::SpotifyClient;

/// Builds the shared HTTP client, authenticator, and API client.
pub(crate) fn api_client(config: &Config) -> SpotifyClient {
    let http = Arc::new(reqwest::Client::new());
    let auth = Arc::new(Authenticator::new(
        AuthParams::from_config(config),
        Arc::clone(&http),
    ));
    SpotifyClient::new(http, config.spotify.api_base.clone(), auth)
}

/// Formats a track duration in milliseconds as `m:ss`.
pub(crate) fn format_duration(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}
