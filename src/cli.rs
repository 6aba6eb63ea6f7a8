//! Command-line interface definition for Spindex
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for login and for browsing the user's Spotify
//! library.

use clap::{Parser, Subcommand};

/// Spindex - Spotify library CLI
///
/// Authenticates against Spotify with the OAuth2 authorization-code +
/// PKCE flow and lists your playlists and liked songs.
#[derive(Parser, Debug, Clone)]
#[command(name = "spindex")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Override the Spotify client id from the config file
    #[arg(long, env = "SPINDEX_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Spindex
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Authenticate with Spotify and cache a token for this process
    Login,

    /// Show the profile of the authenticated user
    Whoami,

    /// List all playlists in your library
    Playlists {
        /// Show at most this many rows (all playlists are still fetched)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List your liked songs (saved tracks)
    Liked {
        /// Show at most this many rows (all tracks are still fetched)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List the tracks of one playlist, looked up by name
    Tracks {
        /// Exact playlist name
        playlist: String,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            client_id: None,
            verbose: false,
            command: Commands::Login,
        }
    }
}
